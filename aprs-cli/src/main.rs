//! aprs-cli: inspect decoded APRS traffic from the command line.
//!
//! Reads decoder-engine output as JSON Lines (one decode result per line,
//! the serialized `EngineFields` set) from a file or stdin and prints either
//! rendered packet summaries or a station table. All decoding has already
//! happened on the engine side of the boundary; this binary is glue.

use std::io::{self, BufRead};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use comfy_table::{Cell, Table};

use aprs_core::{EngineFields, Packet};

#[derive(Parser)]
#[command(name = "aprs", version, about = "APRS packet inspector")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render each record as a human-readable summary
    Render {
        /// Path to JSON Lines file of decode results, or - for stdin
        file: PathBuf,
    },

    /// Print a station table
    Table {
        /// Path to JSON Lines file of decode results, or - for stdin
        file: PathBuf,

        /// Reference latitude for distance/bearing columns
        #[arg(long, requires = "ref_lon")]
        ref_lat: Option<f64>,

        /// Reference longitude for distance/bearing columns
        #[arg(long, requires = "ref_lat")]
        ref_lon: Option<f64>,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Render { file } => cmd_render(file),
        Commands::Table {
            file,
            ref_lat,
            ref_lon,
        } => cmd_table(file, ref_lat, ref_lon),
    }
}

fn open_reader(file: &PathBuf) -> Box<dyn BufRead> {
    if file.to_str() == Some("-") {
        Box::new(io::stdin().lock())
    } else {
        let f = std::fs::File::open(file).unwrap_or_else(|e| {
            eprintln!("Error opening {}: {e}", file.display());
            std::process::exit(1);
        });
        Box::new(io::BufReader::new(f))
    }
}

/// Read decode results line by line. Returns the built records plus counts
/// of lines seen and lines rejected (bad JSON or inconsistent records).
fn load_packets(reader: impl BufRead) -> (Vec<Packet>, u64, u64) {
    let mut packets = Vec::new();
    let mut total = 0u64;
    let mut rejected = 0u64;

    for line in reader.lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => continue,
        };

        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        total += 1;

        let fields: EngineFields = match serde_json::from_str(line) {
            Ok(f) => f,
            Err(e) => {
                eprintln!("Skipping unreadable record: {e}");
                rejected += 1;
                continue;
            }
        };

        match Packet::from_fields(fields) {
            Ok(packet) => packets.push(packet),
            Err(e) => {
                eprintln!("Skipping record: {e}");
                rejected += 1;
            }
        }
    }

    (packets, total, rejected)
}

fn cmd_render(file: PathBuf) {
    let (packets, total, rejected) = load_packets(open_reader(&file));

    for packet in &packets {
        println!("{packet}");
    }

    println!("Records: {total} read, {} rendered, {rejected} rejected", packets.len());
}

fn cmd_table(file: PathBuf, ref_lat: Option<f64>, ref_lon: Option<f64>) {
    let reference = match (ref_lat, ref_lon) {
        (Some(lat), Some(lon)) => Some(reference_packet(lat, lon)),
        _ => None,
    };

    let (packets, total, rejected) = load_packets(open_reader(&file));

    println!();
    println!("Records: {total} read, {} decoded, {rejected} rejected", packets.len());
    println!();

    if packets.is_empty() {
        return;
    }

    println!("{}", summary_table(&packets, reference.as_ref()));
}

/// A synthetic record holding the receiver position, so the distance and
/// bearing columns go through the same packet-to-packet geometry as
/// everything else.
fn reference_packet(lat: f64, lon: f64) -> Packet {
    let fields = EngineFields {
        latitude: Some(lat),
        longitude: Some(lon),
        format: Some(1),
        ..Default::default()
    };
    Packet::from_fields(fields).unwrap_or_else(|e| {
        eprintln!("Invalid reference position: {e}");
        std::process::exit(1);
    })
}

fn summary_table(packets: &[Packet], reference: Option<&Packet>) -> Table {
    let mut table = Table::new();
    let mut header = vec!["Source", "Type", "Lat", "Lon", "Course", "Speed", "Comment"];
    if reference.is_some() {
        header.extend(["Dist (km)", "Brg", "Dir"]);
    }
    table.set_header(header);

    for packet in packets {
        let mut row = vec![
            Cell::new(packet.src_callsign.as_deref().unwrap_or("-")),
            Cell::new(packet.packet_type.to_string()),
            Cell::new(
                packet
                    .latitude
                    .filter(|_| packet.has_location())
                    .map(|l| format!("{l:.4}"))
                    .unwrap_or("-".into()),
            ),
            Cell::new(
                packet
                    .longitude
                    .filter(|_| packet.has_location())
                    .map(|l| format!("{l:.4}"))
                    .unwrap_or("-".into()),
            ),
            Cell::new(
                packet
                    .course
                    .map(|c| c.to_string())
                    .unwrap_or("-".into()),
            ),
            Cell::new(
                packet
                    .speed
                    .map(|s| format!("{s:.0}"))
                    .unwrap_or("-".into()),
            ),
            Cell::new(
                packet
                    .comment
                    .as_deref()
                    .map(str::trim)
                    .filter(|c| !c.is_empty())
                    .unwrap_or("-"),
            ),
        ];

        if let Some(reference) = reference {
            row.push(Cell::new(
                reference
                    .distance_km(packet)
                    .map(|d| format!("{d:.1}"))
                    .unwrap_or("-".into()),
            ));
            row.push(Cell::new(
                reference
                    .bearing_deg(packet)
                    .map(|b| format!("{b:.0}"))
                    .unwrap_or("-".into()),
            ));
            row.push(Cell::new(
                reference.compass_direction(packet).unwrap_or("-"),
            ));
        }

        table.add_row(row);
    }

    table
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::io::Write as _;

    const MIC_E_LINE: &str = r#"{"packet_type":3,"src_callsign":"LA5NTA-9","latitude":60.204833,"longitude":5.4475,"format":2,"speed":50.0,"course":110,"comment":"]WLNK-1=","message_bits":"101"}"#;

    #[test]
    fn test_load_packets_skips_comments_and_blanks() {
        let input = format!("# heard 2024-06-01\n\n{MIC_E_LINE}\n");
        let (packets, total, rejected) = load_packets(Cursor::new(input));
        assert_eq!(total, 1);
        assert_eq!(rejected, 0);
        assert_eq!(packets.len(), 1);
        assert_eq!(packets[0].src_callsign.as_deref(), Some("LA5NTA-9"));
    }

    #[test]
    fn test_load_packets_counts_rejects() {
        let input = format!("not json\n{MIC_E_LINE}\n{{\"packet_type\":0}}\n");
        // Line 1 is unreadable; line 3 is a Location record with no
        // position format.
        let (packets, total, rejected) = load_packets(Cursor::new(input));
        assert_eq!(total, 3);
        assert_eq!(rejected, 2);
        assert_eq!(packets.len(), 1);
    }

    #[test]
    fn test_load_packets_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{MIC_E_LINE}").unwrap();

        let (packets, total, rejected) =
            load_packets(open_reader(&file.path().to_path_buf()));
        assert_eq!((total, rejected), (1, 0));
        assert_eq!(packets.len(), 1);
    }

    #[test]
    fn test_summary_table_plain() {
        let (packets, _, _) = load_packets(Cursor::new(MIC_E_LINE));
        let rendered = summary_table(&packets, None).to_string();
        assert!(rendered.contains("LA5NTA-9"));
        assert!(rendered.contains("Mic-E"));
        assert!(rendered.contains("60.2048"));
        assert!(!rendered.contains("Dist"));
    }

    #[test]
    fn test_summary_table_with_reference() {
        let (packets, _, _) = load_packets(Cursor::new(MIC_E_LINE));
        // Bergen as the receiver site; the station is a short hop away.
        let reference = reference_packet(60.3913, 5.3221);
        let rendered = summary_table(&packets, Some(&reference)).to_string();
        assert!(rendered.contains("Dist (km)"));
        assert!(rendered.contains("21.8"));
    }

    #[test]
    fn test_summary_table_reference_without_fix() {
        let input = r#"{"packet_type":8,"src_callsign":"N0CALL","status":"QRV"}"#;
        let (packets, _, _) = load_packets(Cursor::new(input));
        let reference = reference_packet(60.3913, 5.3221);
        // No position on the station side: geometry columns fall back to -.
        let rendered = summary_table(&packets, Some(&reference)).to_string();
        assert!(rendered.contains("N0CALL"));
        assert!(rendered.contains('-'));
    }
}
