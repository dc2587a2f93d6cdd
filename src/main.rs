use std::{
    fs::File,
    io::{stdin, stdout, BufRead, BufReader, BufWriter, Write},
    path::PathBuf,
    time::Instant,
};

use clap::{Parser, Subcommand};
use hmmtag::{tag_all, BigramModel, Dataset, Evaluation, Model, Space, TrainOpts, Trainer};

#[derive(Debug, Parser)]
#[command(version, about = "Bigram HMM part-of-speech tagger")]
#[command(propagate_version = true)]
struct Argv {
    /// Raise the default log level (-v: debug, -vv: trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Estimate a model from `word/tag` corpora
    Train {
        /// write the model to a file (MODEL)
        #[arg(short, long, value_name = "MODEL")]
        model: PathBuf,
        /// read training options from a JSON file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
        /// set a training parameter (NAME=VALUE), e.g. -p smoothing=laplace
        #[arg(short, value_name = "NAME=VALUE")]
        parameters: Vec<String>,
        #[arg(required = true, value_name = "CORPUS")]
        datasets: Vec<PathBuf>,
    },
    /// Tag sentences, one per line. Reads STDIN if INPUT is omitted or '-'
    Tag {
        /// read a model from a file (MODEL)
        #[arg(short, long, value_name = "MODEL")]
        model: PathBuf,
        /// multiply probabilities in log space
        #[arg(long)]
        log_space: bool,
        /// write the tagged sentences to a file instead of STDOUT
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,
        #[arg(value_name = "INPUT")]
        input: Option<PathBuf>,
    },
    /// Report the tag accuracy of OUTPUT against REFERENCE
    Evaluate {
        output: PathBuf,
        reference: PathBuf,
        /// print the per-tag breakdown
        #[arg(short, long)]
        detail: bool,
    },
    /// Write a model as JSON
    Dump {
        #[arg(short, long, value_name = "MODEL")]
        model: PathBuf,
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,
    },
}

fn open_output(path: Option<&PathBuf>) -> std::io::Result<Box<dyn Write>> {
    Ok(match path {
        Some(p) => Box::new(BufWriter::new(File::create(p)?)),
        None => Box::new(BufWriter::new(stdout().lock())),
    })
}

fn train(
    model: PathBuf,
    config: Option<PathBuf>,
    parameters: Vec<String>,
    datasets: Vec<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let opts = match config {
        Some(p) => TrainOpts::from_json(BufReader::new(File::open(p)?))?,
        None => TrainOpts::default(),
    };
    let mut trainer = Trainer::new(opts)?;
    for s in &parameters {
        let (name, value) = s
            .split_once('=')
            .ok_or_else(|| format!("parameter must be NAME=VALUE: {s}"))?;
        trainer.set(name, value)?;
    }
    log::info!("options: {:?}", trainer.opts());

    let mut ds = Dataset::default();
    for fpath in &datasets {
        log::info!("reading dataset from: {:?}", fpath);
        ds.read(BufReader::new(File::open(fpath)?))?;
    }
    let trained = trainer.train(&ds)?;
    trained.save(&model)?;
    log::info!("write model to {:?}", model);
    Ok(())
}

fn tag(
    model: PathBuf,
    log_space: bool,
    output: Option<PathBuf>,
    input: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let begin = Instant::now();
    let model = BigramModel::from_path(&model)?;
    log::info!(
        "loaded model (tags: {}, words: {}) in {:?}",
        model.num_tags(),
        model.num_words(),
        begin.elapsed()
    );

    let reader: Box<dyn BufRead> = match input {
        Some(p) if p.as_os_str() != "-" => Box::new(BufReader::new(File::open(p)?)),
        _ => Box::new(stdin().lock()),
    };
    let lines = reader.lines().collect::<Result<Vec<_>, _>>()?;

    let begin = Instant::now();
    let space = if log_space { Space::Log } else { Space::Linear };
    let tagged = tag_all(&model, &lines, space);
    log::info!("tagged {} sentences in {:?}", tagged.len(), begin.elapsed());

    let mut w = open_output(output.as_ref())?;
    for seq in tagged {
        writeln!(w, "{seq}")?;
    }
    w.flush()?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let argv = Argv::parse();
    let level = match argv.verbose {
        0 => log::LevelFilter::Info,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
    log::debug!("argv: {:?}", argv);

    match argv.command {
        Command::Train {
            model,
            config,
            parameters,
            datasets,
        } => train(model, config, parameters, datasets),
        Command::Tag {
            model,
            log_space,
            output,
            input,
        } => tag(model, log_space, output, input),
        Command::Evaluate {
            output,
            reference,
            detail,
        } => {
            let evaluation = Evaluation::from_readers(
                BufReader::new(File::open(output)?),
                BufReader::new(File::open(reference)?),
            )?;
            if detail {
                print!("{evaluation}");
            }
            println!("Accuracy= {}", evaluation.accuracy());
            Ok(())
        }
        Command::Dump { model, output } => {
            let model = BigramModel::from_path(model)?;
            let mut w = open_output(output.as_ref())?;
            model.dump(&mut w)?;
            writeln!(w)?;
            w.flush()?;
            Ok(())
        }
    }
}
