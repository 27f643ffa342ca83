/// b64c - text and image <-> Base64 from the command line
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use b64_converter::panel::Download;
use b64_converter::{
    codec, Error, FsFileReader, ImagePanel, ImagePanelBuilder, SelectedFile, TextPanel,
};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "b64c")]
#[command(about = "Convert text and images to and from Base64", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode text as Base64
    EncodeText {
        /// Text to encode
        text: String,
    },
    /// Decode Base64 into text
    DecodeText {
        /// Base64 input
        base64: String,
    },
    /// Check whether input is syntactically Base64
    Validate {
        /// Candidate Base64 string
        input: String,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Encode an image file as Base64
    EncodeImage {
        /// Image file path
        path: PathBuf,
        /// Print a data: URI instead of the bare payload
        #[arg(long)]
        data_uri: bool,
    },
    /// Decode Base64 (or a data: URI) into an image file
    DecodeImage {
        /// Base64 input, or @path to read it from a file
        input: String,
        /// Output file path, written even if it exists
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// MIME type to assume for the decoded data
        #[arg(long, env = "B64C_DEFAULT_MIME", default_value = "image/png")]
        mime: String,
        /// Detect the MIME type from the decoded bytes
        #[arg(long)]
        sniff: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "b64_converter=info,b64c=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::EncodeText { text } => encode_text(text)?,
        Commands::DecodeText { base64 } => decode_text(base64)?,
        Commands::Validate { input, json } => validate(&input, json)?,
        Commands::EncodeImage { path, data_uri } => encode_image(path, data_uri).await?,
        Commands::DecodeImage {
            input,
            output,
            mime,
            sniff,
        } => decode_image(&input, output, mime, sniff).await?,
    }

    Ok(())
}

/// Turn a conversion error into the short message a user should see
fn user_error(err: Error) -> anyhow::Error {
    tracing::debug!("Conversion failed: {:?}", err);
    anyhow::anyhow!(err.user_message().to_string())
}

fn encode_text(text: String) -> anyhow::Result<()> {
    let mut panel = TextPanel::new();
    panel.set_text(text).map_err(user_error)?;
    println!("{}", panel.base64());
    Ok(())
}

fn decode_text(base64: String) -> anyhow::Result<()> {
    let mut panel = TextPanel::new();
    panel.toggle_mode();
    panel.set_base64(base64.trim()).map_err(user_error)?;
    println!("{}", panel.text());
    Ok(())
}

fn validate(input: &str, json: bool) -> anyhow::Result<()> {
    let result = codec::validate(input);
    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else if result.is_valid {
        println!("valid");
    } else {
        println!("invalid: {}", result.reason.as_deref().unwrap_or_default());
    }

    if !result.is_valid {
        std::process::exit(1);
    }
    Ok(())
}

async fn encode_image(path: PathBuf, data_uri: bool) -> anyhow::Result<()> {
    let file = SelectedFile::from_path(path);
    tracing::info!("Encoding {} ({})", file.name, file.mime_type);

    let mut panel = ImagePanel::default();
    panel
        .select_file(&FsFileReader, file)
        .await
        .map_err(user_error)?;

    if data_uri {
        let blob = panel
            .preview()
            .and_then(|preview| preview.blob())
            .context("Encoded image has no preview")?;
        println!("{}", codec::to_data_uri(&blob.bytes, &blob.mime_type));
    } else {
        println!("{}", panel.base64());
    }
    Ok(())
}

async fn decode_image(
    input: &str,
    output: Option<PathBuf>,
    mime: String,
    sniff: bool,
) -> anyhow::Result<()> {
    let base64 = match input.strip_prefix('@') {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path))?,
        None => input.to_string(),
    };

    let mut panel = ImagePanelBuilder::new()
        .with_default_mime_type(mime)
        .with_mime_sniffing(sniff)
        .build();
    panel.toggle_mode();
    panel.set_base64(base64.trim()).map_err(user_error)?;

    let download = panel.download().map_err(user_error)?;
    let output = output_path(output, &download, Path::new("."))?;
    write_download(&download, &output).await
}

/// Where a decoded image goes. An explicit path is used as given; the
/// derived default name never replaces an existing file.
fn output_path(output: Option<PathBuf>, download: &Download, dir: &Path) -> anyhow::Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path);
    }

    let path = dir.join(format!(
        "{}.{}",
        download.file_name,
        extension_for(&download.mime_type)
    ));
    if path.exists() {
        bail!("Refusing to overwrite {}; pass -o to choose the output", path.display());
    }
    Ok(path)
}

async fn write_download(download: &Download, output: &Path) -> anyhow::Result<()> {
    download
        .save_to(output)
        .await
        .with_context(|| format!("Failed to write {}", output.display()))?;
    tracing::info!(
        "Wrote {} bytes of {} to {}",
        download.bytes.len(),
        download.mime_type,
        output.display()
    );
    Ok(())
}

fn extension_for(mime_type: &str) -> &'static str {
    match mime_type {
        "image/jpeg" => "jpg",
        "image/gif" => "gif",
        "image/webp" => "webp",
        "image/bmp" => "bmp",
        "image/svg+xml" => "svg",
        "image/x-icon" => "ico",
        "image/avif" => "avif",
        "image/png" => "png",
        _ => "bin",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_decode_image() {
        let cli = Cli::try_parse_from(["b64c", "decode-image", "@in.txt", "-o", "out.gif", "--sniff"]).unwrap();
        match cli.command {
            Commands::DecodeImage {
                input,
                output,
                sniff,
                ..
            } => {
                assert_eq!(input, "@in.txt");
                assert_eq!(output, Some(PathBuf::from("out.gif")));
                assert!(sniff);
            }
            _ => panic!("expected decode-image"),
        }
    }

    fn png_download() -> Download {
        Download {
            file_name: "image".to_string(),
            mime_type: "image/png".to_string(),
            bytes: bytes::Bytes::from_static(&[0x89, b'P', b'N', b'G']),
        }
    }

    #[test]
    fn output_path_protects_only_derived_name() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let download = png_download();

        let derived = output_path(None, &download, temp_dir.path()).unwrap();
        assert_eq!(derived, temp_dir.path().join("image.png"));

        std::fs::write(&derived, b"old").unwrap();
        assert!(output_path(None, &download, temp_dir.path()).is_err());

        let explicit = output_path(Some(derived.clone()), &download, temp_dir.path()).unwrap();
        assert_eq!(explicit, derived);
    }

    #[tokio::test]
    async fn write_download_overwrites_and_reports_path() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let download = png_download();

        let path = temp_dir.path().join("out.png");
        std::fs::write(&path, b"old").unwrap();
        write_download(&download, &path).await.unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), download.bytes.as_ref());

        let missing = temp_dir.path().join("no_such_dir").join("out.png");
        let err = write_download(&download, &missing).await.unwrap_err();
        assert_eq!(err.to_string(), format!("Failed to write {}", missing.display()));
    }

    #[test]
    fn extension_lookup() {
        assert_eq!(extension_for("image/jpeg"), "jpg");
        assert_eq!(extension_for("application/octet-stream"), "bin");
    }
}
