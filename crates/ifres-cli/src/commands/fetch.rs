use crate::cli::FetchArgs;
use crate::download::{DownloadOutcome, DownloadProgress, StructureDownloader};
use crate::error::Result;
use crate::utils::progress::download_bar;
use indicatif::ProgressBar;
use tracing::info;

pub async fn run(args: FetchArgs, quiet: bool) -> Result<()> {
    let downloader = StructureDownloader::new();
    let mut pb: Option<ProgressBar> = None;

    let progress_callback = |progress: DownloadProgress| match progress {
        DownloadProgress::Started { total_size } => {
            pb = Some(download_bar(total_size, quiet));
        }
        DownloadProgress::Downloading { downloaded } => {
            if let Some(pb) = &pb {
                pb.set_position(downloaded);
            }
        }
    };

    let outcome = downloader
        .download(&args.pdb_id, &args.output_dir, args.force, progress_callback)
        .await;
    if let Some(pb) = &pb {
        pb.finish_and_clear();
    }

    match outcome? {
        DownloadOutcome::Downloaded(path) => {
            info!("Saved structure to {:?}", &path);
            println!("✓ Downloaded {}", path.display());
        }
        DownloadOutcome::AlreadyPresent(path) => {
            println!(
                "✓ {} already exists (use --force to download again)",
                path.display()
            );
        }
    }
    Ok(())
}
