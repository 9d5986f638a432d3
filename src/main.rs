///
/// Interactive front end for the versification mapper.
///
use std::env;
use std::io::{self, BufRead, Write};
use std::process;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use versemap::loader::MappingSource;
use versemap::mapping::MappingTable;
use versemap::system;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("usage: versemap <mapping-file> [left-system] [pivot-system]");
        process::exit(1);
    }
    let left_name = args.get(2).map(String::as_str).unwrap_or("KJV");
    let pivot_name = args.get(3).map(String::as_str).unwrap_or("KJV");
    let left = match system::get(left_name) {
        Some(v11n) => Arc::new(v11n),
        None => {
            eprintln!("unknown versification: {}", left_name);
            process::exit(1);
        }
    };
    let pivot = match system::get(pivot_name) {
        Some(v11n) => Arc::new(v11n),
        None => {
            eprintln!("unknown versification: {}", pivot_name);
            process::exit(1);
        }
    };
    let source = match MappingSource::from_path(&args[1]) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("{}: {}", args[1], e);
            process::exit(1);
        }
    };
    info!(entries = source.len(), left = %left.name(), pivot = %pivot.name(), "compiling mapping table");
    let table = MappingTable::new(left, pivot, source.entries());
    if table.has_errors() {
        eprintln!("{} entries failed to compile (see log)", table.diagnostics().len());
    }

    println!("Commands:");
    println!("  map <osis>         translate a {} verse to {}", table.left().name(), table.pivot().name());
    println!("  qualified <osis>   same, keeping part tags and section names");
    println!("  unmap <osis>       translate a {} verse back", table.pivot().name());
    println!("  absent             list {} verses absent in {}", table.pivot().name(), table.left().name());
    println!("  quit");

    let stdin = io::stdin();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => (),
        }
        let line = line.trim();
        let (command, argument) = match line.split_once(' ') {
            Some((command, argument)) => (command, argument.trim()),
            None => (line, ""),
        };
        let outcome = match command {
            "" => continue,
            "quit" | "exit" => break,
            "absent" => Ok(table.absent().osis_ref()),
            "map" => table.map_str(argument),
            "qualified" => table.map_to_qualified_str(argument),
            "unmap" => table.unmap_str(argument),
            _ => {
                println!("unknown command: {}", command);
                continue;
            }
        };
        match outcome {
            Ok(result) if result.is_empty() => println!("(no mapping)"),
            Ok(result) => println!("{}", result),
            Err(e) => println!("error: {}", e),
        }
    }
}
