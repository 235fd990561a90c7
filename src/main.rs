//! WikiVaani CLI - the presentation layer driving the pipeline
//!
//! Owns the session context, displays records and errors verbatim, and lets
//! the user retry immediately. All decision logic lives in the library.

use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use wikivaani::{
    ArticleRecord, ArticleResolver, AudioCapture, CondenseLength, Config, KnowledgeSource,
    ResolveError, SessionContext, SpeechRecognizer, SpeechSynthesizer, SpokenLanguage,
    WikipediaSource, capture_speech, condense, relanguage, simplify,
};

/// How many history entries the recent view shows
const RECENT_SHOWN: usize = 3;

/// WikiVaani - voice-driven encyclopedia reader
#[derive(Parser)]
#[command(name = "wikivaani", version, about)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve an article from a typed query
    Search {
        /// Query text (topic, person, event, concept)
        query: String,

        /// Print the full article body, not just the summary
        #[arg(long)]
        full: bool,
    },
    /// Capture a spoken query from the microphone and resolve it
    Voice {
        /// Spoken language (english, hindi, telugu, tamil, marathi)
        #[arg(short, long, default_value = "english")]
        language: String,
    },
    /// Synthesize text to speech; MP3 bytes go to stdout
    Speak {
        /// Text to synthesize
        text: String,

        /// Synthesis language code (e.g. "en", "hi")
        #[arg(short, long, default_value = "en")]
        language: String,
    },
    /// Interactive session: typed searches, voice search, history, transforms
    Session {
        /// Spoken language for voice searches
        #[arg(short, long, default_value = "english")]
        language: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "info,wikivaani=info",
        1 => "info,wikivaani=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(io::stderr)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::from_env();

    match cli.command {
        Command::Search { query, full } => {
            let query = query.trim();
            if query.is_empty() {
                anyhow::bail!("query must not be empty");
            }

            let resolver = resolver(&config);
            let article = resolver.resolve(query).await?;
            print_article(&article, full);
            Ok(())
        }
        Command::Voice { language } => {
            let language = SpokenLanguage::from_tag(&language);
            let Some(query) = listen_for_query(&config, language).await? else {
                return Ok(());
            };

            let resolver = resolver(&config);
            let article = resolve_spoken(&resolver, &config, &query).await?;
            print_article(&article, true);
            Ok(())
        }
        Command::Speak { text, language } => {
            let synthesizer = SpeechSynthesizer::new(config.voice.synthesizer_endpoint.clone());
            let stream = synthesizer.synthesize(&text, &language).await?;

            let mut stdout = io::stdout().lock();
            stdout.write_all(&stream.bytes)?;
            stdout.flush()?;
            tracing::info!(bytes = stream.len(), format = stream.format, "audio written");
            Ok(())
        }
        Command::Session { language } => {
            let language = SpokenLanguage::from_tag(&language);
            interactive(config, language).await
        }
    }
}

fn resolver(config: &Config) -> ArticleResolver<WikipediaSource> {
    ArticleResolver::with_search_limit(
        WikipediaSource::new(&config.source),
        config.source.search_limit,
    )
}

/// Capture one spoken query; capture conditions are displayed, not fatal
async fn listen_for_query(
    config: &Config,
    language: SpokenLanguage,
) -> anyhow::Result<Option<String>> {
    let mut capture = match AudioCapture::new() {
        Ok(capture) => capture,
        Err(e) => {
            println!("Error: {e}");
            return Ok(None);
        }
    };
    let recognizer = SpeechRecognizer::from_config(&config.voice);

    println!("Listening... speak your full sentence now ({language})");

    match capture_speech(&mut capture, &recognizer, &config.listen, language).await {
        Ok(text) => {
            println!("Recognized: {text}");
            Ok(Some(text))
        }
        Err(e) => {
            println!("{e}");
            Ok(None)
        }
    }
}

/// Resolve a recognized query, with one extra keyword pass before giving up
async fn resolve_spoken(
    resolver: &ArticleResolver<WikipediaSource>,
    config: &Config,
    query: &str,
) -> anyhow::Result<ArticleRecord> {
    match resolver.resolve(query).await {
        Ok(article) => Ok(article),
        Err(ResolveError::NoResultFound { .. }) => {
            println!("Couldn't find an exact match for '{query}'; showing closest match...");
            let candidates = resolver
                .source()
                .search(query, config.source.search_limit)
                .await?;
            match candidates.first() {
                Some(first) => Ok(resolver.resolve(first).await?),
                None => anyhow::bail!("couldn't find a page related to '{query}'; try rephrasing"),
            }
        }
        Err(e) => Err(e.into()),
    }
}

async fn interactive(config: Config, language: SpokenLanguage) -> anyhow::Result<()> {
    let resolver = resolver(&config);
    let recognizer = SpeechRecognizer::from_config(&config.voice);
    let synthesizer = SpeechSynthesizer::new(config.voice.synthesizer_endpoint.clone());

    let mut session = SessionContext::new();
    let mut last_article: Option<ArticleRecord> = None;

    println!("WikiVaani - type a topic (e.g. Albert Einstein, India, Water Cycle)");
    println!("Commands: :voice  :history  :summary <short|medium|long>  :translate <language>  :simple  :speak  :quit");

    loop {
        print!("wikivaani> ");
        io::stdout().flush()?;

        let Some(line) = io::stdin().lock().lines().next() else {
            break;
        };
        let line = line?;
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        match input {
            ":quit" | ":q" => break,
            ":history" => show_history(&session),
            ":voice" => {
                let Some(query) = listen_for_query(&config, language).await? else {
                    continue;
                };
                match resolve_spoken(&resolver, &config, &query).await {
                    Ok(article) => {
                        print_article(&article, true);
                        session.record(&query, &article);
                        last_article = Some(article);
                    }
                    Err(e) => println!("{e}"),
                }
            }
            ":simple" => match &last_article {
                Some(article) => println!("{}", simplify(&article.summary)),
                None => println!("Search for an article first"),
            },
            ":speak" => match &last_article {
                Some(article) => {
                    match synthesizer
                        .synthesize(&article.content, language.synthesis_code())
                        .await
                    {
                        Ok(stream) => {
                            println!("Synthesized {} bytes ({})", stream.len(), stream.format);
                        }
                        Err(e) => println!("{e}"),
                    }
                }
                None => println!("Search for an article first"),
            },
            _ if input.starts_with(":summary") => {
                let tier = input
                    .strip_prefix(":summary")
                    .map(str::trim)
                    .and_then(CondenseLength::from_label);
                match (&last_article, tier) {
                    (Some(article), Some(tier)) => println!("{}", condense(&article.content, tier)),
                    (None, _) => println!("Search for an article first"),
                    (_, None) => println!("Usage: :summary <short|medium|long>"),
                }
            }
            _ if input.starts_with(":translate") => {
                let target = input.strip_prefix(":translate").map(str::trim).unwrap_or("");
                if target.is_empty() {
                    println!("Usage: :translate <language>");
                    continue;
                }
                match &last_article {
                    Some(article) => {
                        println!("Translated summary: {}", relanguage(&article.summary, target));
                        println!("Translated content: {}", relanguage(&article.content, target));
                    }
                    None => println!("Search for an article first"),
                }
            }
            _ if input.starts_with(':') => println!("Unknown command: {input}"),
            query => match resolver.resolve(query).await {
                Ok(article) => {
                    print_article(&article, true);
                    session.record(query, &article);
                    last_article = Some(article);
                }
                Err(e) => println!("{e}"),
            },
        }
    }

    Ok(())
}

fn print_article(article: &ArticleRecord, full: bool) {
    println!("\n{}", article.title);
    println!("\nSummary: {}", article.summary);
    if full {
        println!("\n{}", article.content);
    }
    println!("\nRead more: {}\n", article.url);
}

fn show_history(session: &SessionContext) {
    if session.history.is_empty() {
        println!("No search history yet");
        return;
    }

    println!("Recent searches:");
    for entry in session.history.recent(RECENT_SHOWN).iter().rev() {
        println!("  {} ({})", entry.query, entry.timestamp.format("%H:%M"));
    }

    println!("All searches:");
    for (i, entry) in session.history.entries().iter().rev().enumerate() {
        println!(
            "  {}. {} -> {} ({})",
            i + 1,
            entry.query,
            entry.title,
            entry.timestamp.format("%H:%M")
        );
    }
}
