use alanrun::acode::Image;
use alanrun::header::Header;
use alanrun::story::Story;
use std::env;
use std::fs::File;
use std::io::prelude::*;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        println!("Usage: {} <story.a3c>", args[0]);
        return Ok(());
    }

    let mut file = File::open(&args[1])?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;

    let image = Image::from_bytes(&bytes)?;
    let header = Header::new(&image)?;
    println!("{}", header);

    let story = Story::from_image(&bytes)?;
    println!("{}", story.dictionary);
    println!("{}", story);
    Ok(())
}
