use clap::{Parser, Subcommand};
use content_admin_common::AdminContext;
use content_admin_core::Table;
use content_admin_error::{AdminError, AdminResult};
use content_admin_models::{
    constants::DEFAULT_CONFIG_FILE_NAME,
    entities::prelude::{BlogPost, Event, NewsItem, SponsoredEvent, TeamMember},
    EntityKind, Record,
};
use content_admin_web::AdminWebServer;
use std::{env::current_dir, path::PathBuf};
use tracing::{info, Level};

/// Content admin - manage events, news, blogs, sponsored events and team
/// members stored in the managed backend.
#[derive(Parser)]
#[command(name = "content-admin")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Content admin service", long_about = None)]
struct Cli {
    /// Sets a custom config file with full path
    ///
    /// If not specified, 'admin.toml' in the current working directory is
    /// used when present.
    #[arg(short, long, env = "CA_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP API until SIGINT/SIGTERM (default)
    Serve,
    /// Print the current rows of one entity as a table
    List {
        /// events, news, blogs, sponsoreds or team-members
        entity: EntityKind,
    },
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> AdminResult<()> {
    let cli = Cli::parse();

    let config_path = match cli.config {
        Some(p) => p,
        None => {
            let dir = current_dir()
                .map_err(|e| AdminError::from(format!("Failed to get current directory: {e}")))?;
            dir.join(DEFAULT_CONFIG_FILE_NAME)
        }
    };

    let ctx = AdminContext::init(config_path.to_string_lossy().to_string())?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(&ctx).await,
        Command::List { entity } => {
            ctx.change_log_level(Level::WARN);
            let table = match entity {
                EntityKind::Events => render::<Event>(&ctx).await?,
                EntityKind::News => render::<NewsItem>(&ctx).await?,
                EntityKind::Blogs => render::<BlogPost>(&ctx).await?,
                EntityKind::Sponsoreds => render::<SponsoredEvent>(&ctx).await?,
                EntityKind::TeamMembers => render::<TeamMember>(&ctx).await?,
            };
            print!("{table}");
            Ok(())
        }
    }
}

async fn serve(ctx: &AdminContext) -> AdminResult<()> {
    let server = AdminWebServer::start(ctx)?;
    info!(
        prefix = %ctx.settings().web.router_prefix,
        "Content admin is ready"
    );

    ctx.wait_for_shutdown().await?;
    server.stop().await;
    info!("Shutdown complete");
    Ok(())
}

async fn render<R: Record>(ctx: &AdminContext) -> AdminResult<Table> {
    let mut view = ctx.list_view::<R>();
    view.mount().await?;
    let table = view.render();
    view.unmount();
    Ok(table)
}
