use anyhow::{Context, Result};
use bat::PrettyPrinter;
use clap::{Parser, Subcommand};
use cliclack::spinner;
use console::style;
use std::path::PathBuf;
use std::sync::Arc;

use braid::agents::pipeline::{metrics_pipeline, write_artifact, Blogger};
use braid::agents::{Agent, FanOut, Router};
use braid::evals::extract_label;
use braid::providers::configs::openai::{OpenAiProviderConfig, OPENAI_DEFAULT_HOST};
use braid::providers::openai::OpenAiProvider;

const SAMPLE_REPORT: &str = "
Q3 Performance Summary:
Our customer satisfaction score rose to 92 points this quarter.
Revenue grew by 45% compared to last year.
Market share is now at 23% in our primary market.
Customer churn decreased to 5% from 8%.
New user acquisition cost is $43 per user.
Product adoption rate increased to 78%.
Employee satisfaction is at 87 points.
Operating margin improved to 34%.
";

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// OpenAI API Key (can also be set via OPENAI_API_KEY environment variable)
    #[arg(short, long, global = true)]
    api_key: Option<String>,

    /// Model to use
    #[arg(short, long, global = true, default_value = "gpt-4o-mini")]
    model: String,

    /// Per-call completion token ceiling
    #[arg(long, global = true, default_value_t = 1000)]
    max_tokens: i32,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the extract/normalize/sort/format chain over a metrics report
    Report {
        /// Report file to process; a built-in sample is used when omitted
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
    /// Generate a blog post via the outline/refine/expand chain
    Blog {
        #[arg(short, long)]
        topic: String,

        #[arg(long, default_value = "general readers")]
        audience: String,

        #[arg(short, long, default_value_t = 800)]
        words: usize,

        /// Write the finished post to this path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Classify a support ticket into one of a set of categories
    Route {
        /// Ticket text
        ticket: String,

        #[arg(long, value_delimiter = ',', default_values_t = [
            "billing".to_string(),
            "technical".to_string(),
            "account".to_string(),
            "product".to_string(),
        ])]
        choices: Vec<String>,
    },
    /// Run one instruction over many inputs concurrently
    Fanout {
        /// Instruction applied to every input
        instruction: String,

        /// Independent inputs, one completion each
        #[arg(required = true)]
        inputs: Vec<String>,

        #[arg(short, long, default_value_t = 3)]
        workers: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Credential is resolved once, up front, and handed to the provider
    // explicitly; nothing below reads ambient state.
    let config = match cli.api_key.clone() {
        Some(api_key) => OpenAiProviderConfig::new(api_key, OPENAI_DEFAULT_HOST.to_string()),
        None => OpenAiProviderConfig::from_env().context(
            "API key must be provided via --api-key or OPENAI_API_KEY environment variable",
        )?,
    };
    let provider = Arc::new(OpenAiProvider::new(config)?);

    match cli.command {
        Command::Report { input } => {
            let report = match input {
                Some(path) => std::fs::read_to_string(&path)
                    .with_context(|| format!("reading report from {}", path.display()))?,
                None => SAMPLE_REPORT.to_string(),
            };

            let chain = metrics_pipeline(provider, &cli.model).with_max_tokens(cli.max_tokens);
            let steps = chain.steps().len();

            let spin = spinner();
            spin.start(format!("processing report ({steps} steps)"));
            let result = chain.run(&report).await?;
            spin.stop("");

            render(&result.output);
        }
        Command::Blog {
            topic,
            audience,
            words,
            output,
        } => {
            let blogger = Blogger::new(provider, &cli.model, &topic, &audience, words)
                .with_max_tokens(cli.max_tokens);

            let spin = spinner();
            spin.start("drafting post");
            let post = blogger.generate().await?.output;
            spin.stop("");

            match output {
                Some(path) => {
                    write_artifact(&path, &post)?;
                    println!("post saved to {}", style(path.display()).green());
                }
                None => render(&post),
            }
        }
        Command::Route { ticket, choices } => {
            let agent = Agent::new(
                provider,
                "You are a customer support triage assistant.",
                &cli.model,
            )
            .with_max_tokens(cli.max_tokens);
            let router = Router::new(agent, choices)?;

            let spin = spinner();
            spin.start("routing ticket");
            let response = router.route(&ticket).await?;
            spin.stop("");

            println!("{}", response);
            match extract_label(&response, router.choices()) {
                Ok(label) => println!("\nrouted to: {}", style(label).green().bold()),
                Err(e) => println!("\n{}", style(e).yellow()),
            }
        }
        Command::Fanout {
            instruction,
            inputs,
            workers,
        } => {
            let agent = Agent::new(provider, "You are a helpful assistant.", &cli.model)
                .with_max_tokens(cli.max_tokens);
            let exec = FanOut::new(agent, instruction).with_workers(workers);

            let spin = spinner();
            spin.start(format!("dispatching {} tasks", inputs.len()));
            let outputs = exec.run(inputs).await?;
            spin.stop("");

            for (ix, output) in outputs.iter().enumerate() {
                println!("{}", style(format!("--- result {} ---", ix + 1)).dim());
                render(output);
                println!();
            }
        }
    }

    Ok(())
}

fn render(content: &str) {
    PrettyPrinter::new()
        .input_from_bytes(content.as_bytes())
        .language("markdown")
        .print()
        .unwrap();
}
