use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use serde_json::Value;

use blog_platform::api::{ApiClient, ApiResponse, BlogResource, FilePart, UploadResource};
use blog_platform::routing::{admin_app, site_app, Application};

#[derive(Parser)]
#[command(name = "blog-cli")]
#[command(about = "Command-line access to the blog API", long_about = None)]
struct Cli {
    #[arg(short, long, env = "BLOG_API_BASE", default_value = "http://localhost:65432/api")]
    url: String,

    /// Request timeout in seconds.
    #[arg(short, long, default_value_t = 10)]
    timeout: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read published blogs
    Blogs {
        #[command(subcommand)]
        command: BlogCommands,
    },
    /// Upload a picture
    Upload { file: PathBuf },
    /// Show which view an application renders for a path
    Route {
        #[arg(value_enum)]
        app: AppKind,
        path: String,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum AppKind {
    Site,
    Admin,
}

#[derive(Subcommand)]
enum BlogCommands {
    /// List all blogs
    List,
    /// Show one blog
    Get { id: String },
    /// List blogs grouped by archive
    Archives,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = || ApiClient::new(&cli.url, Duration::from_secs(cli.timeout)).map(Arc::new);

    let response = match cli.command {
        Commands::Route { app, path } => {
            return match app {
                AppKind::Site => print_route(&site_app()?, &path, |v| v.name()),
                AppKind::Admin => print_route(&admin_app()?, &path, |v| v.name()),
            };
        }
        Commands::Blogs { command } => {
            let blogs = BlogResource::new(client()?);
            match command {
                BlogCommands::List => blogs.get_blogs().await?,
                BlogCommands::Get { id } => blogs.get_blog_by_id(&id).await?,
                BlogCommands::Archives => blogs.get_blogs_by_archives().await?,
            }
        }
        Commands::Upload { file } => {
            let uploads = UploadResource::new(client()?);
            uploads.upload_img(FilePart::from_path(&file).await?).await?
        }
    };

    print_response(&response)?;
    Ok(())
}

fn print_response(response: &ApiResponse) -> Result<(), Box<dyn std::error::Error>> {
    match response.json::<Value>() {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{}", response.text()),
    }
    Ok(())
}

fn print_route<V: Clone>(
    app: &Application<V>,
    path: &str,
    view_name: impl Fn(&V) -> &'static str,
) -> Result<(), Box<dyn std::error::Error>> {
    let nav = app.navigate(path)?;
    println!("app:      {} (mounted on {})", nav.app, nav.mount);
    println!("path:     {}", nav.route.path);
    println!("pattern:  {}", nav.route.pattern);
    println!("view:     {}", view_name(&nav.route.view));
    for (name, value) in &nav.route.params {
        println!("param:    {} = {}", name, value);
    }
    if nav.route.redirects > 0 {
        println!("redirects: {}", nav.route.redirects);
    }
    Ok(())
}
