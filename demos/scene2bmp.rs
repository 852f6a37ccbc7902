//! Render scene description into a BMP image
#![deny(warnings)]

use bmpdraw::{Error, RGB, Scene};
use std::{
    env,
    fmt,
    fs::File,
    io::{BufReader, BufWriter, Write},
    process,
};
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

const EXIT_USAGE: i32 = 1;
const EXIT_READ_INPUT: i32 = 2;
const EXIT_INVALID_INPUT: i32 = 3;
const EXIT_DUPLICATE_ID: i32 = 4;
const EXIT_WRITE_OUTPUT: i32 = 5;
const EXIT_OUT_OF_MEMORY: i32 = 6;
const EXIT_UNRECOGNISED: i32 = 7;

#[derive(Debug, PartialEq)]
enum Mode {
    /// Render scene into an image of the given size
    Render { width: usize, height: usize },
    /// Dump parsed scene as JSON, size is not needed
    Json,
}

#[derive(Debug, PartialEq)]
struct Args {
    input_file: String,
    output_file: String,
    background: RGB,
    mode: Mode,
}

fn parse_size(name: &str, value: &str) -> Result<usize, String> {
    value
        .parse()
        .map_err(|_| format!("invalid {}: {}", name, value))
}

impl Args {
    fn parse() -> Result<Args, String> {
        Self::parse_from(env::args().skip(1))
    }

    fn parse_from(args: impl IntoIterator<Item = String>) -> Result<Args, String> {
        let mut args = args.into_iter();
        let mut positional = Vec::new();
        let mut background = RGB::WHITE;
        let mut json = false;
        while let Some(arg) = args.next() {
            match arg.as_ref() {
                "-h" => return Err(String::new()),
                "-b" => {
                    background = args
                        .next()
                        .ok_or("-b requires color #rrggbb argument")?
                        .parse()
                        .map_err(|error| format!("-b: {}", error))?;
                }
                "-j" => json = true,
                _ => positional.push(arg),
            }
        }
        let mut positional = positional.into_iter();
        let (Some(input_file), Some(output_file)) = (positional.next(), positional.next()) else {
            return Err("expected <input> and <output> arguments".to_owned());
        };
        let size = (positional.next(), positional.next(), positional.next());
        let mode = match size {
            // size is accepted but ignored when dumping JSON
            (Some(_), Some(_), None) | (None, None, None) if json => Mode::Json,
            (Some(width), Some(height), None) => Mode::Render {
                width: parse_size("width", &width)?,
                height: parse_size("height", &height)?,
            },
            _ => return Err("expected <input> <output> <width> <height>".to_owned()),
        };
        Ok(Args {
            input_file,
            output_file,
            background,
            mode,
        })
    }
}

fn usage(cmd: &str, error: &str) -> ! {
    if !error.is_empty() {
        eprintln!("Error: {}", error);
    }
    eprintln!("Render scene description into a BMP image");
    eprintln!("\nUSAGE:");
    eprintln!(
        "    {} [-b <color>] [-j] <input> <output> [<width> <height>]",
        cmd
    );
    eprintln!("\nARGS:");
    eprintln!("    -b <color>    background color (default: #ffffff)");
    eprintln!("    -j            write parsed scene as JSON instead of rendering it");
    eprintln!("    <input>       scene file, one command per line ('-' means stdin)");
    eprintln!("    <output>      image in the BMP format ('-' means stdout)");
    eprintln!("    <width>       width of the image in pixels (not needed with -j)");
    eprintln!("    <height>      height of the image in pixels (not needed with -j)");
    process::exit(EXIT_USAGE);
}

#[derive(Debug)]
enum Failure {
    ReadInput { path: String, error: Error },
    WriteOutput { path: String, error: Error },
    Scene(Error),
}

impl Failure {
    fn exit_code(&self) -> i32 {
        match self {
            Failure::ReadInput { .. } => EXIT_READ_INPUT,
            Failure::WriteOutput { .. } => EXIT_WRITE_OUTPUT,
            Failure::Scene(error) => match error {
                Error::InvalidLine { .. }
                | Error::InvalidInput { .. }
                | Error::PropertyNameTooLong { .. } => EXIT_INVALID_INPUT,
                Error::DuplicateIdentifier { .. } => EXIT_DUPLICATE_ID,
                Error::OutOfMemory { .. } => EXIT_OUT_OF_MEMORY,
                _ => EXIT_UNRECOGNISED,
            },
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Failure::ReadInput { path, error } => {
                write!(f, "could not read input file \"{}\": {}", path, error)
            }
            Failure::WriteOutput { path, error } => {
                write!(f, "could not write file \"{}\": {}", path, error)
            }
            Failure::Scene(error) => write!(f, "{}", error),
        }
    }
}

/// Load scene from the file
fn scene_load(path: &str) -> Result<Scene, Failure> {
    let read_input = |error: Error| Failure::ReadInput {
        path: path.to_owned(),
        error,
    };
    let result = if path != "-" {
        let file = File::open(path).map_err(|error| read_input(error.into()))?;
        Scene::read(BufReader::new(file))
    } else {
        Scene::read(std::io::stdin().lock())
    };
    result.map_err(|error| match error {
        Error::Io(_) => read_input(error),
        error => Failure::Scene(error),
    })
}

fn output_open(path: &str) -> Result<Box<dyn Write>, Failure> {
    if path == "-" {
        return Ok(Box::new(std::io::stdout().lock()));
    }
    let file = File::create(path).map_err(|error| Failure::WriteOutput {
        path: path.to_owned(),
        error: error.into(),
    })?;
    Ok(Box::new(BufWriter::new(file)))
}

fn run(args: Args) -> Result<(), Failure> {
    let scene = scene_load(&args.input_file)?;
    let write_output = |error: Error| Failure::WriteOutput {
        path: args.output_file.clone(),
        error,
    };

    let (width, height) = match args.mode {
        Mode::Render { width, height } => (width, height),
        Mode::Json => {
            let json = scene.to_json().map_err(Failure::Scene)?;
            let mut out = output_open(&args.output_file)?;
            return writeln!(out, "{}", json).map_err(|error| write_output(error.into()));
        }
    };

    let canvas = scene
        .render(width, height, args.background)
        .map_err(Failure::Scene)?;
    let out = output_open(&args.output_file)?;
    canvas.write_bmp(out).map_err(|error| match error {
        Error::Io(_) => write_output(error),
        error => Failure::Scene(error),
    })
}

fn main() {
    tracing_subscriber::fmt()
        .with_span_events(FmtSpan::CLOSE)
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cmd = env::args().next().unwrap_or_else(|| "scene2bmp".to_owned());
    let args = match Args::parse() {
        Ok(args) => args,
        Err(error) => usage(&cmd, &error),
    };
    tracing::debug!("[args] {:?}", args);
    if let Err(failure) = run(args) {
        eprintln!("Error: {}", failure);
        process::exit(failure.exit_code());
    }
}
