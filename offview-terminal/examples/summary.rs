/// Example: Print statistics for an OFF file without opening the viewer
///
/// Usage: cargo run --example summary -- path/to/file.off [factor]

use offview_core::Mesh;
use std::env;
use std::process;

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <off-file> [factor]", args[0]);
        process::exit(2);
    }

    let mut mesh = match Mesh::load(&args[1]) {
        Ok(mesh) => mesh,
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    };

    let factor = args.get(2).and_then(|s| s.parse::<f32>().ok());
    print!("{}", offview_terminal::summarize(&mut mesh, true, factor));
}
