use std::path::Path;

use recon_parser::{parse_dir, parse_file};

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::args().nth(1).ok_or("path argument")?;
    let path = Path::new(&path);

    let journal = if path.is_dir() {
        let extension = std::env::args().nth(2).unwrap_or_else(|| "journal".to_string());
        parse_dir(path, &extension)?
    } else {
        parse_file(path)?
    };
    dbg!(journal);
    Ok(())
}

fn main() {
    if let Err(e) = run() {
        println!("Error: {}", e);
    }
}
