use cartdis::config::{ConfigFile, Console, Options};
use cartdis::disassembler::Disassembler;
use cartdis::image::RomImage;
use log::debug;
use std::env;
use std::fs::File;
use std::io::prelude::*;
use std::path::Path;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = env::args().collect();

    let mut options = Options::new(Console::Atari2600);
    let mut config_path: Option<String> = None;
    let mut filename: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-7" => options.console = Console::Atari7800,
            "-a" => options.accumulator_text = false,
            "-b" => options.trace_brk = true,
            "-c" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("-c requires a config file argument");
                    std::process::exit(1);
                }
                config_path = Some(args[i].clone());
            }
            "-d" => options.discriminate = false,
            "-f" => options.word_prefixes = true,
            "-i" => options.trace_interrupt = true,
            "-k" => options.pokey = true,
            "-p" => options.processor_directive = true,
            "-r" => options.relocate_mirrors = true,
            "-s" => options.cycle_counts = true,
            "-x" => options.dump_bytes = true,
            "-h" | "--help" => {
                eprintln!("Usage: {} [options] <rom-file>", args[0]);
                eprintln!("\nOptions:");
                eprintln!("  -7         Atari 7800 image (default is 2600)");
                eprintln!("  -a         render accumulator operands without the explicit A");
                eprintln!("  -b         trace the BRK vector as an entry point");
                eprintln!("  -c <file>  read data/graphics address ranges from a TOML file");
                eprintln!("  -d         disable code/data discrimination");
                eprintln!("  -f         emit .w/.wx/.wy/.ind prefixes for absolute operands below $100");
                eprintln!("  -i         trace the 7800 interrupt vector as an entry point");
                eprintln!("  -k         name the POKEY registers at $4000 (7800 only)");
                eprintln!("  -p         emit a processor directive in the header");
                eprintln!("  -r         relocate mirror references into the code window");
                eprintln!("  -s         append per-instruction cycle counts");
                eprintln!("  -x         dump the raw instruction bytes ahead of each line");
                eprintln!("  -h         show this help message");
                std::process::exit(0);
            }
            arg if !arg.starts_with('-') => {
                filename = Some(arg.to_string());
                break;
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let filename = filename.unwrap_or_else(|| {
        eprintln!("Usage: {} [options] <rom-file>", args[0]);
        eprintln!("Try '{} -h' for help", args[0]);
        std::process::exit(1);
    });

    if let Some(path) = config_path {
        let (config, echo) = ConfigFile::load(Path::new(&path))?;
        options.echo_config = true;
        config.apply(echo, &mut options);
    }

    let mut file = File::open(&filename)?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;
    debug!("Loaded {} bytes from {}", bytes.len(), filename);

    let image = RomImage::load(bytes, options.console)?;
    let listing = Disassembler::new(&image, options).run();
    print!("{}", listing);
    Ok(())
}
