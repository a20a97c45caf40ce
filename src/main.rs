use alanrun::command::{interpret_line, Session};
use alanrun::config::Config;
use alanrun::interpret::TracingInterpreter;
use alanrun::output::Transcript;
use alanrun::runtime::Runtime;
use alanrun::story::Story;
use alanrun::world::GameState;
use log::{debug, info};
use std::env;
use std::fs::File;
use std::io::prelude::*;
use std::io::{self, BufRead};
use std::path::Path;

fn usage(program: &str) {
    println!("arun - command interpreter for compiled Alan stories");
    println!();
    println!("Usage: {} <story.a3c> [--config file.toml]", program);
    println!();
    println!("Reads player commands from standard input and shows which verb");
    println!("bodies each command would run. Set RUST_LOG=info to see the trace.");
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        usage(&args[0]);
        return Ok(());
    }

    let story_path = &args[1];
    let config = match args.iter().position(|a| a == "--config") {
        Some(i) => match args.get(i + 1) {
            Some(path) => Config::load(Path::new(path))?,
            None => {
                eprintln!("Error: --config needs a file name");
                std::process::exit(1);
            }
        },
        None => Config::default(),
    };

    debug!("Loading story: {}", story_path);
    let mut file = match File::open(story_path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Error: Cannot open story file '{}': {}", story_path, e);
            std::process::exit(1);
        }
    };
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;

    let story = Story::from_image(&bytes)?;
    info!(
        "Story loaded: {} instances, hero is {}",
        story.instance_max(),
        story.instance_name(story.hero)
    );

    let mut world = GameState::new(&story);
    let mut interpreter = TracingInterpreter::default();
    let mut output = Transcript::new(&story, config.message_table());
    let mut session = Session::new();

    let stdin = io::stdin();
    print!("> ");
    io::stdout().flush()?;
    for line in stdin.lock().lines() {
        let line = line?;
        {
            let mut rt = Runtime::new(&story, &mut world, &mut interpreter, &mut output).with_trace(config.trace);
            interpret_line(&mut rt, &mut session, &line);
        }
        let text = output.take();
        if !text.is_empty() {
            println!("{}", text.trim_end());
        }
        print!("\n> ");
        io::stdout().flush()?;
    }
    println!();
    Ok(())
}
