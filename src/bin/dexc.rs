use std::path::PathBuf;

use clap::{ArgAction, Parser};
use dexclient::{ChapterDownloadRequest, ChapterDownloader, ClientConfigBuilder, DexClient};
use tower::{Service, ServiceExt};

#[derive(Debug, Parser)]
#[command(
    name = "dexc",
    version,
    author,
    about = "CLI tool to download chapter from mangadex"
)]
struct Arguments {
    #[arg(help = "Chapter id or url")]
    chapter: String,
    #[arg(short, long, default_value = ".", help = "destination folder")]
    path: PathBuf,
    #[arg(
        short = 'r',
        long = "raw",
        action=ArgAction::SetFalse,
        default_value_t = true,
        help = "download uncompressed images"
    )]
    data_saver: bool,
    #[arg(long, default_value = dexclient::BASE_API, help = "api base url")]
    api_url: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let args = Arguments::parse();
    let req = if args.chapter.contains("mangadex.org") {
        ChapterDownloadRequest::from_url(&args.chapter)?
    } else {
        ChapterDownloadRequest::new(&args.chapter)
    };
    let req = req.path(&args.path).data_saver(args.data_saver);

    let client = DexClient::with_config(
        ClientConfigBuilder::default()
            .base_url(args.api_url)
            .build()?,
    )?;
    let mut download_service = ChapterDownloader::new(client);
    download_service.ready().await?.call(req).await?;
    Ok(())
}
