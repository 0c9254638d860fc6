use clap::Parser;
use log::{error, info};
use phoray_json::{load_system, schemas, serde_json, JsonError, JsonSer};
use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Write},
};

mod cli;
mod logger;

use cli::Args;
use logger::init_logger;

fn write_json(args: &Args, json: &serde_json::Value) -> Result<(), JsonError> {
    let mut writer: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };
    serde_json::to_writer_pretty(&mut writer, json)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

fn run(args: &Args) -> Result<(), JsonError> {
    if args.schemas {
        let schemas = Vec::from_iter(schemas().iter().map(JsonSer::to_json));
        return write_json(args, &serde_json::Value::Array(schemas));
    }

    let Some(path) = &args.system else {
        return Err(JsonError::Malformed("no system file given".into()));
    };

    info!("loading {}", path.display());
    let system = load_system(BufReader::new(File::open(path)?))?;
    info!(
        "{} elements, {} sources, {} rays per source",
        system.elements.len(),
        system.sources.len(),
        args.rays
    );

    let trace = if args.parallel {
        system.trace_parallel(args.rays, args.chunk_size.get())
    } else {
        system.trace(args.rays)
    };

    for (index, source) in trace.sources.iter().enumerate() {
        let survivors = source.output().map_or(0, |rays| rays.alive());
        info!("source {index}: {survivors} of {} rays made it through", args.rays);
    }

    write_json(
        args,
        &serde_json::json!({
            "system": system.to_json(),
            "trace": trace.to_json(),
        }),
    )
}

fn main() {
    let args = Args::parse();
    init_logger(args.log_level.clone().into());

    if let Err(e) = run(&args) {
        error!("{e}");
        std::process::exit(1);
    }
}
