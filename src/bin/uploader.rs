use docstream::chunk::FileSource;
use docstream::client::{ClientConfig, UploadClient};
use docstream::manager::UploadManager;
use docstream::metrics::MetricsConfig;
use docstream::progress::{format_file_size, format_speed};
use docstream::upload::{UploadMetadata, UploadService};

fn usage() -> ! {
    eprintln!(
        "Usage: docstream-uploader <base-url> <reference-id> <section> <document> <zone> <file> [file...]\n\
         \n\
         Environment:\n\
         \x20 DOCSTREAM_METRICS_ADDR   start a Prometheus exporter on this address\n\
         \x20 DOCSTREAM_JSON           also print results as JSON"
    );
    std::process::exit(2);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() < 6 {
        usage();
    }

    println!("\n╔══════════════════════════════════════════════════════════════════╗");
    println!("║              docstream - Document Upload Client                  ║");
    println!("╚══════════════════════════════════════════════════════════════════╝\n");

    if let Ok(addr) = std::env::var("DOCSTREAM_METRICS_ADDR") {
        let config = MetricsConfig::with_addr(addr.parse()?);
        docstream::metrics::start_metrics_server(config)?;
        println!("📊 Metrics exporter listening on {addr}");
    }

    let base_url = &args[0];
    let metadata = UploadMetadata::new(&args[1], &args[2], &args[3], &args[4]);
    let paths = &args[5..];

    println!("🌐 Upload endpoint: {base_url}");
    println!("📋 Reference: {}\n", metadata.reference_id);

    let client = UploadClient::new(ClientConfig::with_base_url(base_url));
    let manager = UploadManager::new(UploadService::new(client));

    let mut sources = Vec::with_capacity(paths.len());
    for path in paths {
        let source = FileSource::open(path).await?;
        println!(
            "📦 {} ({}, {})",
            source.file_name(),
            format_file_size(source.size()),
            source.content_type()
        );
        sources.push(source);
    }

    println!("\n🚀 Uploading {} file(s)...\n", sources.len());
    let results = manager.upload_files(&sources, &metadata).await;

    let mut failures = 0;
    for (source, result) in sources.iter().zip(&results) {
        if result.success {
            println!(
                "✓ {} -> {} ({} ms)",
                source.file_name(),
                result.key.as_deref().unwrap_or(""),
                result.performance.total_time
            );
        } else {
            failures += 1;
            println!(
                "✗ {} failed: {}",
                source.file_name(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    println!(
        "\n📈 {} uploaded, {} failed, average {:.0} ms, last speed {}",
        results.len() - failures,
        failures,
        manager.average_total_ms(),
        format_speed(manager.current_speed_bps())
    );

    if std::env::var("DOCSTREAM_JSON").is_ok() {
        println!("{}", serde_json::to_string_pretty(&results)?);
    }

    if failures > 0 {
        std::process::exit(1);
    }
    Ok(())
}
