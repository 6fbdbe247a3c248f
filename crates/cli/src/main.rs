use std::env;
use std::{path::Path, process::ExitCode};

use stronghold_nbt::NbtTag;
use stronghold_nbt::io::read_nbt_file;


fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let Some(command) = args.first() else {
        print_usage();
        return ExitCode::from(1);
    };

    match command.as_str() {
        "print" => cmd_print(&args[1 ..]),
        other => {
            eprintln!("Unknown command: {other}");
            print_usage();
            ExitCode::from(2)
        }
    }
}

fn print_usage() {
    eprintln!("Usage: stronghold <command> <file> [selector]");
    eprintln!("Commands:");
    eprintln!("    print - print an NBT file, optionally narrowed to a dotted selector");
}

fn cmd_print(args: &[String]) -> ExitCode {
    let (path, selector) = match args {
        [path] => (path, None),
        [path, selector] => (path, Some(selector.as_str())),
        _ => {
            print_usage();
            return ExitCode::from(3);
        }
    };

    if !Path::new(path).exists() {
        eprintln!("File {path} does not exist");
        return ExitCode::from(3);
    }

    let (root, root_name) = match read_nbt_file(path) {
        Ok(read) => read,
        Err(err) => {
            eprintln!("Could not read {path}: {err}");
            return ExitCode::from(3);
        }
    };

    let tag = match selector {
        Some(selector) => match select(&root, selector) {
            Some(tag) => tag,
            None => {
                eprintln!("Selector {selector} does not match any tag");
                return ExitCode::from(4);
            }
        },
        None => &root,
    };

    println!("Root name: {root_name:?}");
    println!("{tag:#}");
    ExitCode::SUCCESS
}

/// Walks a dotted selector down the tag tree: each step is a compound key or a list
/// index.
fn select<'a>(root: &'a NbtTag, selector: &str) -> Option<&'a NbtTag> {
    let mut tag = root;
    for step in selector.split('.') {
        tag = match tag {
            NbtTag::Compound(compound) => compound.get_tag(step)?,
            NbtTag::List(list) => list.get_tag(step.parse().ok()?)?,
            _ => return None,
        };
    }
    Some(tag)
}
