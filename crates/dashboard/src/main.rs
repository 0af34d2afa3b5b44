// Terminal front end for the dashboard controller

use std::sync::Arc;
use chrono::Utc;
use log::{error, info, warn};
use shared::{format_change, format_currency, format_volume, init_logging_with};

use crypto_dashboard::{
    analyze, build_report, write_report, ControllerOptions, DashboardConfig, DashboardController,
    DashboardSnapshot, HttpMarketSource, ReportKind,
};

const TABLE_ROWS: usize = 10;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = DashboardConfig::load().map_err(|e| {
        eprintln!("Failed to load dashboard configuration: {}", e);
        e
    })?;

    init_logging_with(&config.log_level);

    let source = Arc::new(HttpMarketSource::new(&config)?);
    let controller = DashboardController::new(source, ControllerOptions::from(&config));
    let mut updates = controller.subscribe();

    info!("Loading initial market data...");
    controller.refresh(true).await;
    print_summary(&controller.snapshot());

    if config.write_report {
        let snapshot = controller.snapshot();
        let report = build_report(ReportKind::Summary, &snapshot.ranking, snapshot.global.as_ref(), Utc::now());
        if let Err(e) = write_report(&report, &config.report_dir) {
            error!("Failed to export report: {}", e);
        }
    }

    controller.start_auto_refresh();
    if !controller.is_auto_refreshing() {
        warn!("Auto-refresh disabled, showing a single snapshot");
        return Ok(());
    }
    info!("Press Ctrl-C to stop");

    // skip the changes made by the initial refresh
    drop(updates.borrow_and_update());
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = updates.borrow_and_update().clone();
                if !snapshot.loading {
                    print_summary(&snapshot);
                }
            }
            _ = &mut shutdown => {
                info!("Shutting down");
                break;
            }
        }
    }

    controller.stop_auto_refresh();
    Ok(())
}

fn print_summary(snapshot: &DashboardSnapshot) {
    let updated = snapshot
        .last_update
        .map(|at| at.format("%H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "never".to_string());
    println!();
    println!("=== Crypto market ({} / {}d) updated {} ===", snapshot.selected_asset, snapshot.selected_range_days, updated);

    if snapshot.using_fallback {
        println!("(showing placeholder data)");
    }
    if let Some(message) = &snapshot.error {
        println!("! {}", message);
    }

    if let Some(global) = &snapshot.global {
        println!(
            "Market cap {} ({})  Volume {}  BTC dominance {:.1}%  Assets {}",
            format_volume(global.total_market_cap),
            format_change(global.market_cap_change_24h),
            format_volume(global.total_volume),
            global.btc_dominance,
            global.active_cryptocurrencies
        );
    }

    for metric in &snapshot.metrics {
        println!(
            "  {:<10} {:>14} {:>8}  vol {:>9}  cap {:>9}",
            metric.title, metric.value, metric.change, metric.volume, metric.market_cap
        );
    }

    if let (Some(first), Some(last)) = (snapshot.chart.first(), snapshot.chart.last()) {
        println!(
            "Chart: {} points, {} {} -> {} {}",
            snapshot.chart.len(),
            first.date,
            format_currency(first.price),
            last.date,
            format_currency(last.price)
        );
    }

    for asset in snapshot.ranking.iter().take(TABLE_ROWS) {
        println!(
            "  #{:<3} {:<6} {:>14} {:>8}  vol {:>9}",
            asset.rank,
            asset.symbol,
            format_currency(asset.price),
            format_change(asset.change_24h),
            format_volume(asset.volume)
        );
    }

    if let Some(analysis) = analyze(&snapshot.ranking) {
        println!(
            "Trend: {} (avg {:+.2}%), sentiment {}, {} gainers ({:.1}%) / {} losers ({:.1}%)",
            if analysis.is_bullish() { "bullish" } else { "bearish" },
            analysis.avg_change,
            if analysis.is_optimistic() { "optimistic" } else { "pessimistic" },
            analysis.gainers,
            analysis.gainer_share(),
            analysis.losers,
            analysis.loser_share()
        );
    }
}
