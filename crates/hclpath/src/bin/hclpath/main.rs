mod cli;

use anyhow::Context;
use hclpath::editor::{AttributeGet, Editor, HclSink, Parser, Sink, ValueFormat};
use std::path::Path;

fn main() {
    use clap::Parser as _;
    let cli = cli::Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_env("HCLPATH_LOG"))
        .with_writer(std::io::stderr)
        .init();

    for new_path in cli.directory.iter() {
        match new_path.canonicalize() {
            Err(e) => {
                eprintln!(
                    "Failed to resolve path for -C/--directory {}\n{}",
                    new_path.display(),
                    e
                );
                std::process::exit(1);
            }
            Ok(cwd) => {
                if let Err(err) = std::env::set_current_dir(&cwd) {
                    eprintln!("Failed to set work directory to {}\n{}", cwd.display(), err,);
                    std::process::exit(1);
                }

                tracing::info!(directory=%cwd.display(), "Changed working directory");
            }
        }
    }

    let command_result = match cli.command {
        cli::Command::Attribute(attribute_cli) => match attribute_cli.command {
            cli::AttributeSubCommand::Get(get_cli) => get(get_cli),
        },
        cli::Command::Dev(dev_cli) => dev(dev_cli),
    };

    if let Err(e) = command_result {
        for error in e.chain() {
            eprintln!("{error}")
        }
        std::process::exit(1);
    }
}

pub fn get(cli: cli::GetCommand) -> anyhow::Result<()> {
    let attribute_get = AttributeGet::new(cli.address.as_str());

    let sink: Box<dyn Sink> = match cli.output.format {
        cli::OutputFormat::Raw => Box::new(attribute_get.clone()),
        cli::OutputFormat::Hcl => Box::new(HclSink),
        cli::OutputFormat::Json => Box::new(attribute_get.clone().with_format(ValueFormat::Json)),
        cli::OutputFormat::Yaml => Box::new(attribute_get.clone().with_format(ValueFormat::Yaml)),
    };

    let editor = Editor::new(
        Parser::new(filename(&cli.input)),
        vec![Box::new(attribute_get)],
        sink,
    );

    match &cli.input.file {
        Some(path) => editor.apply(open(path)?, std::io::stdout().lock())?,
        None => editor.apply(std::io::stdin().lock(), std::io::stdout().lock())?,
    }

    Ok(())
}

fn filename(input: &cli::InputArgs) -> String {
    input
        .file
        .as_ref()
        .map_or_else(|| "-".to_owned(), |path| path.display().to_string())
}

fn open(path: &Path) -> anyhow::Result<std::fs::File> {
    tracing::info!(path=%path.display(), "loading file");
    std::fs::File::open(path).with_context(|| format!("Failed to open {}", path.display()))
}

fn load(input: &cli::InputArgs) -> anyhow::Result<hcl_edit::structure::Body> {
    let contents = match &input.file {
        Some(path) => std::io::read_to_string(open(path)?)?,
        None => std::io::read_to_string(std::io::stdin())?,
    };

    Ok(Parser::new(filename(input)).parse(&contents)?)
}

/// (hclpath-)developer utilities
///
/// A quick way to expose internal structures for debugging purposes
pub fn dev(cli: cli::DevCommand) -> anyhow::Result<()> {
    use cli::DevSubCommand::*;

    let body = load(&cli.input)?;

    match cli.command {
        Body => println!("{body:#?}"),
        Blocks { address } => {
            let address = hclpath::address::Address::parse(&address)?;
            let blocks =
                hclpath::resolve::find_longest_matching_blocks(&body, address.segments())?;
            println!("{blocks:#?}");
        }
        Tokens { address } => {
            if let (Some(attribute), _) = hclpath::resolve::find_attribute(&body, &address)? {
                println!("{:#?}", hclpath::token::Tokens::from(attribute));
            }
        }
    }

    Ok(())
}
