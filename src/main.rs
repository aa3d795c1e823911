use anyhow::{Context, Result};
use hype_rs::config::{GeoDataConfig, ParameterLibrary, ParameterOptions, TableSpec, read_mapping};
use hype_rs::{align, geoclass, io, params};

mod cli;
mod logging;

use cli::{Command, GeoClassArgs, GeoDataArgs, ParArgs, get_args};

fn main() -> Result<()> {
    let args = get_args();
    logging::init(args.verbose)?;

    match args.command {
        Command::GeoClass(args) => run_geoclass(args),
        Command::GeoData(args) => run_geodata(args),
        Command::Par(args) => run_par(args),
    }
}

fn run_geoclass(args: GeoClassArgs) -> Result<()> {
    let mapping = match &args.mapping {
        Some(path) => read_mapping(path)
            .with_context(|| format!("Failed to read mapping: {:?}", path))?,
        None => geoclass::default_mapping(),
    };

    let combination = io::load_table(&args.input, args.layer.as_deref(), None)
        .with_context(|| format!("Failed to read class combinations: {:?}", args.input))?;

    let written = geoclass::write_geoclass(combination, &args.output, &mapping, &args.comment)
        .with_context(|| format!("Failed to write GeoClass file: {:?}", args.output))?;

    println!(
        "GeoClass complete. {} classes saved to {}",
        written.n_rows(),
        args.output.display()
    );
    Ok(())
}

fn run_geodata(args: GeoDataArgs) -> Result<()> {
    let config = GeoDataConfig::from_path(&args.config)
        .with_context(|| format!("Failed to read GeoData config: {:?}", args.config))?;

    let mut tables = Vec::with_capacity(config.tables.len());
    let mut specs: Vec<TableSpec> = Vec::with_capacity(config.tables.len());
    for input in &config.tables {
        println!("Loading {}...", input.path.display());
        let table = io::load_table(&input.path, input.layer.as_deref(), input.delimiter_byte()?)
            .with_context(|| format!("Failed to read table: {:?}", input.path))?;
        tables.push(table);
        specs.push(input.spec.clone());
    }

    let merged = align::write_geodata(tables, &specs, &config.sort_key, &config.outfile)
        .context("Failed to build GeoData")?;

    println!(
        "GeoData complete. {} subbasins saved to {}",
        merged.n_rows(),
        config.outfile.display()
    );
    Ok(())
}

fn run_par(args: ParArgs) -> Result<()> {
    let library = ParameterLibrary::from_path(&args.library)
        .with_context(|| format!("Failed to read parameter library: {:?}", args.library))?;

    let options = ParameterOptions {
        soil_number: args.soil_number,
        soil_type: args.soil_type,
        land_cover_number: args.land_cover_number,
        land_cover_type: args.land_cover_type,
    };

    params::write_parameters(&args.output, &library, &options)
        .with_context(|| format!("Failed to write parameters: {:?}", args.output))?;

    println!("Parameters appended to {}", args.output.display());
    Ok(())
}
