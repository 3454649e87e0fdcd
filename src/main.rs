//! Deezer Overlay - console probe
//!
//! One-shot diagnostic: reads the Deezer window title, shows the parse
//! result and the artwork lookup outcome, and prints the snapshot the tray
//! would receive. Useful for checking the System Events automation
//! permission without booting the tray app.

use anyhow::Result;
use deezer_overlay::parser::{self, ParsedTitle};
use deezer_overlay::platform::{NativeTitleSource, TitleReading, TitleSource};
use deezer_overlay::{ArtworkResolver, Reconciler, TrackKey};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .init();

    println!("🎵 Deezer Overlay - Probe");
    println!("=========================\n");

    let source = NativeTitleSource::new();

    // Raw reading
    println!("🪟 Window title:");
    let reading = match source.read_title() {
        Ok(reading) => {
            print_reading(&reading);
            reading
        }
        Err(e) => {
            println!("   ❌ {e}");
            return Ok(());
        }
    };

    // Parse
    if let TitleReading::Window(raw) = &reading {
        println!("\n🔍 Parsed:");
        match parser::parse_window_title(raw) {
            ParsedTitle::Track { title, artist } => {
                println!("   Title:  {title}");
                println!("   Artist: {artist}");

                // Artwork
                println!("\n🖼  Artwork lookup:");
                let mut resolver = ArtworkResolver::new();
                match resolver.resolve(&TrackKey::new(&title, &artist)) {
                    Some(url) => println!("   ✅ {url}"),
                    None => println!("   (no cover found)"),
                }
            }
            ParsedTitle::Unparsed { raw } => {
                println!("   (no track in title: {raw:?})");
            }
        }
    }

    // The snapshot the tray would receive on this tick
    println!("\n📊 Snapshot:");
    let mut reconciler = Reconciler::new();
    let tick = reconciler.tick(Ok(reading));
    println!("{}", serde_json::to_string_pretty(&tick.snapshot)?);
    if tick.shutdown {
        println!("\n⚠️  This reading would shut the overlay down.");
    }

    Ok(())
}

fn print_reading(reading: &TitleReading) {
    match reading {
        TitleReading::ApplicationAbsent => println!("   ⚠️  Deezer is not running"),
        TitleReading::NoWindow => println!("   ⚠️  Deezer has no readable window"),
        TitleReading::Window(raw) => println!("   {raw:?}"),
    }
}
