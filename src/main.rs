//! agent-eval - command-line entry point

use std::path::{Path, PathBuf};

use agent_eval::tools::ToolRegistry;
use agent_eval::{logging, Agent, Config, Repl};
use clap::{Parser, Subcommand};

/// agent-eval - run a tool-using LLM agent
#[derive(Parser, Debug)]
#[command(name = "agent-eval")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Model in provider/model form (overrides MODEL_NAME)
    #[arg(long, short = 'm', global = true)]
    model: Option<String>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the agent once on a prompt
    Run {
        /// The instruction for the agent
        prompt: String,

        /// Override the iteration cap
        #[arg(long)]
        max_iterations: Option<usize>,

        /// Execute tools without asking
        #[arg(long)]
        auto_approve: bool,

        /// Print the full outcome as JSON
        #[arg(long)]
        json: bool,

        /// Save the outcome transcript to this path
        #[arg(long)]
        save: Option<PathBuf>,
    },

    /// Start an interactive session
    Chat,

    /// List the built-in tools
    ListTools,

    /// Check environment, configuration, and tools
    Validate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    let mut config = Config::load();
    if let Some(model) = args.model {
        config.set_model(model);
    }

    match args.command {
        Command::Run {
            prompt,
            max_iterations,
            auto_approve,
            json,
            save,
        } => {
            if auto_approve {
                config.agent.auto_approve_tools = true;
            }

            let mut agent = Agent::from_config(config)?;
            let outcome = agent.run(&prompt, max_iterations).await;

            if let Some(path) = save {
                outcome.save_json(&path)?;
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                println!("{}", outcome.response);
                eprintln!("\n{}", outcome.metrics.summary());
            }
        }

        Command::Chat => {
            let mut repl = Repl::with_config(config)?;
            repl.run().await?;
        }

        Command::ListTools => {
            let tools = ToolRegistry::with_defaults(false);
            println!("Found {} tools:", tools.len());
            for schema in tools.schemas() {
                println!("  • {}: {}", schema.name, schema.description);
            }
        }

        Command::Validate => validate(&config)?,
    }

    Ok(())
}

fn validate(config: &Config) -> anyhow::Result<()> {
    println!("🔍 Validating agent-eval setup...\n");

    if Path::new(".env").exists() {
        println!("✓ .env file found");
    } else {
        println!("⚠ .env file not found");
    }

    if Config::config_file().exists() {
        println!("✓ Config file: {}", Config::config_file().display());
    } else {
        println!(
            "⚠ No config file, using defaults. Save this as {} to customize:\n\n{}",
            Config::config_file().display(),
            Config::default_config_toml()
        );
    }

    config.validate()?;
    println!("✓ Model {} is configured", config.model.name);

    println!("\n🛠 Checking tools...");
    let tools = ToolRegistry::with_defaults(false);
    tools.validate()?;
    println!("✓ Found {} tools", tools.len());

    println!("\n✅ Validation complete!");
    Ok(())
}
