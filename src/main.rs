use clap::{Parser, Subcommand};
use color_eyre::Result;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use tribuna::club::{category, DataManager};
use tribuna::config::Config;
use tribuna::store::RestStore;

#[derive(Parser, Debug)]
#[command(name = "tribuna")]
#[command(about = "Admin CLI for the club website data")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/tribuna/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// News articles
  News {
    #[command(subcommand)]
    action: NewsAction,
  },
  /// List the squad
  Players,
  /// List staff members
  Staff,
  /// List fixtures and results
  Matches,
  /// Featured-article maintenance
  Featured {
    #[command(subcommand)]
    action: FeaturedAction,
  },
}

#[derive(Subcommand, Debug)]
enum NewsAction {
  /// List all articles in site order
  List,
  /// Show one article by slug
  Show { slug: String },
}

#[derive(Subcommand, Debug)]
enum FeaturedAction {
  /// Show the current featured set
  List,
  /// Demote everything beyond the three most recent featured articles
  Cleanup,
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .with_writer(std::io::stderr)
    .init();

  let args = Args::parse();

  let config = Config::load(args.config.as_deref())?;
  let api_key = Config::get_api_key()?;
  let store = RestStore::new(&config.store.url, api_key)?;
  let manager = DataManager::new(Arc::new(store));

  if let Some(title) = &config.title {
    println!("== {} ==", title);
  }

  match args.command {
    Command::News { action } => match action {
      NewsAction::List => {
        for article in manager.site_articles().await? {
          let mark = if article.featured { "*" } else { " " };
          println!(
            "{} {}  [{}]  {}  ({})",
            mark,
            article.published_at.format("%Y-%m-%d"),
            category::label(&article.category),
            article.title,
            article.slug,
          );
        }
      }
      NewsAction::Show { slug } => match manager.article_by_slug(&slug).await? {
        Some(article) => {
          println!("{}", article.title);
          println!(
            "{} · {} · {}",
            article.published_at.format("%Y-%m-%d %H:%M"),
            category::label(&article.category),
            article.author,
          );
          if !article.tags.is_empty() {
            println!("tags: {}", article.tags.join(", "));
          }
          println!("\n{}\n\n{}", article.excerpt, article.body);
        }
        None => println!("No article with slug '{}'", slug),
      },
    },
    Command::Players => {
      for player in manager.players().await? {
        println!(
          "#{:<3} {:<28} {:<14} {:>3}  {}",
          player.number,
          player.name,
          player.position.label(),
          player.age,
          player.nationality,
        );
      }
    }
    Command::Staff => {
      for member in manager.staff().await? {
        println!("{:<28} {}", member.name, member.role);
      }
    }
    Command::Matches => {
      for fixture in manager.matches().await? {
        let score = match (fixture.home_score, fixture.away_score) {
          (Some(h), Some(a)) => format!("{}-{}", h, a),
          _ => "vs".to_string(),
        };
        println!(
          "{}  {} {} {}  [{}] {} ({})",
          fixture.kickoff.format("%Y-%m-%d %H:%M"),
          fixture.home,
          score,
          fixture.away,
          fixture.status.as_str(),
          fixture.tournament,
          fixture.venue,
        );
      }
    }
    Command::Featured { action } => match action {
      FeaturedAction::List => {
        for article in manager.featured_articles().await? {
          println!(
            "{}  {}",
            article.published_at.format("%Y-%m-%d"),
            article.title
          );
        }
      }
      FeaturedAction::Cleanup => {
        let demoted = manager.cleanup_featured().await?;
        println!("Demoted {} article(s)", demoted);
      }
    },
  }

  Ok(())
}
