use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

use linkboard::config::ClientConfig;
use linkboard::core::helpers::plain_text;
use linkboard::{ApiClient, AuthOutcome, FeedState, FileStore, Post, ProfileFeed, SessionStore};

const REGISTERED: &str = "Registered.";
const LOGGED_IN: &str = "Logged in.";

#[derive(Parser)]
#[command(name = "linkboard", about = "Profile and posts from the linkboard API")]
struct Cli {
    /// API origin (without the /api prefix)
    #[arg(long, global = true)]
    api_base: Option<String>,

    /// File holding the persisted session
    #[arg(long, global = true)]
    session_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    Register { name: String, email: String, password: String },
    Login { email: String, password: String },
    Logout,
    Whoami,
    /// Show your profile and posts
    Profile,
    #[command(flatten)]
    Post(PostCommand),
}

#[derive(Subcommand)]
enum PostCommand {
    Edit { post: String, text: String },
    Delete { post: String },
    Like { post: String },
    Dislike { post: String },
    Comment { post: String, text: String },
    Uncomment { post: String, comment: String },
}

mod render {
    use super::*;
    use linkboard::Profile;

    pub fn profile(profile: &Profile) {
        println!("[{}] {}", profile.initial(), profile.display_name());
        if !profile.user.email.is_empty() {
            println!("    {}", profile.user.email);
        }
        println!("    Bio: {}", profile.bio);
        println!("    Location: {}", profile.location);
        for (network, url) in &profile.social {
            println!("    {}: {}", network, url);
        }
    }

    pub fn post(post: &Post) {
        println!("--- {} (+{} / -{})", post.id, post.likes, post.dislikes);
        println!("{}", plain_text(&post.text));
        for comment in &post.comments {
            println!("    > [{}] {}", comment.id, plain_text(&comment.text));
        }
    }

    pub fn feed(profile: &Profile, posts: &[Post]) {
        self::profile(profile);
        println!();
        println!("Your posts ({})", posts.len());
        if posts.is_empty() {
            println!("You have not posted anything yet.");
        }
        for p in posts {
            post(p);
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<bool> {
    let mut config = ClientConfig::from_env();
    if let Some(base) = cli.api_base {
        config.api_base = base;
    }
    if let Some(path) = cli.session_file {
        config.session_file = path;
    }
    debug!(api = %config.api_base, session = %config.session_file.display(), "starting");

    let api = ApiClient::from_config(&config)?;
    let mut sessions = SessionStore::new(FileStore::new(&config.session_file), api.clone());
    sessions.initialize();

    let action = match cli.command {
        Command::Register { name, email, password } => {
            let outcome = sessions.register(&name, &email, &password).await;
            return Ok(report_auth(outcome, REGISTERED));
        }
        Command::Login { email, password } => {
            return Ok(report_auth(sessions.login(&email, &password).await, LOGGED_IN));
        }
        Command::Logout => {
            sessions.logout();
            println!("Logged out.");
            return Ok(true);
        }
        Command::Whoami => {
            match sessions.session() {
                Some(s) => println!("{} ({})", s.name, s.id),
                None => println!("Not logged in."),
            }
            return Ok(sessions.is_authenticated());
        }
        Command::Profile => None,
        Command::Post(action) => Some(action),
    };

    let mut feed = ProfileFeed::new(api, &sessions);
    let cancel = feed.cancel_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });

    feed.load_profile_and_posts().await;
    if let FeedState::Error(msg) = feed.state() {
        eprintln!("{}", msg);
        return Ok(false);
    }

    let Some(action) = action else {
        render::feed(feed.profile(), feed.posts());
        return Ok(true);
    };

    let target = match action {
        PostCommand::Edit { post, text } => {
            feed.update_post(&post, &text).await;
            post
        }
        PostCommand::Delete { post } => {
            if feed.delete_post(&post).await {
                println!("Deleted {}.", post);
            }
            post
        }
        PostCommand::Like { post } => {
            feed.like_post(&post).await;
            post
        }
        PostCommand::Dislike { post } => {
            feed.dislike_post(&post).await;
            post
        }
        PostCommand::Comment { post, text } => {
            feed.add_comment(&post, &text).await;
            post
        }
        PostCommand::Uncomment { post, comment } => {
            feed.delete_comment(&post, &comment).await;
            post
        }
    };

    if let Some(msg) = feed.notice() {
        eprintln!("{}", msg);
        return Ok(false);
    }
    if let Some(post) = feed.post(&target) {
        render::post(post);
    }
    Ok(true)
}

fn auth_message(outcome: AuthOutcome, success: &str) -> Result<String, String> {
    match outcome {
        AuthOutcome::Success => Ok(success.to_string()),
        AuthOutcome::Failure(msg) => Err(msg),
    }
}

fn report_auth(outcome: AuthOutcome, success: &str) -> bool {
    match auth_message(outcome, success) {
        Ok(line) => {
            println!("{}", line);
            true
        }
        Err(line) => {
            eprintln!("{}", line);
            false
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let ok = run(Cli::parse()).await?;
    if !ok {
        std::process::exit(1);
    }
    Ok(())
}
