//! Interactive terminal reader.

use std::io::Write;
use std::path::PathBuf;
use storyweave::{
    NavigationOutcome, PageControls, ReaderConfig, StoryFormat, StoryReader, load_story,
};
use tokio::io::{AsyncBufReadExt, BufReader};

/// One line of reader input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReaderCommand {
    /// Pick the nth visible choice, counting from 1
    Choose(usize),
    Back,
    Restart,
    NextImage,
    Debug,
    Quit,
}

impl ReaderCommand {
    fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "b" | "back" => Some(Self::Back),
            "r" | "restart" => Some(Self::Restart),
            "i" | "image" => Some(Self::NextImage),
            "d" | "debug" => Some(Self::Debug),
            "q" | "quit" => Some(Self::Quit),
            other => other
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .map(Self::Choose),
        }
    }
}

/// Handles the read command.
///
/// Renders the current page, then reads one command per line from stdin
/// until `q` or end of input.
#[tracing::instrument(skip_all, fields(path = %path.display()))]
pub async fn handle_read_command(
    path: PathBuf,
    config_path: Option<PathBuf>,
    delay_ms: Option<u64>,
    page_record: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match config_path {
        Some(config_path) => ReaderConfig::from_file(&config_path)?,
        None => ReaderConfig::default(),
    };
    if let Some(delay_ms) = delay_ms {
        config = config.with_transition_delay_ms(delay_ms);
    }
    tracing::info!(
        delay_ms = *config.transition_delay_ms(),
        "Reader configuration loaded"
    );

    let raw = load_story(&path, StoryFormat::from_page_record_flag(page_record))?;
    let (reader, trace) = StoryReader::open(&raw, config)?;
    if trace.inconsistency_count() > 0 {
        tracing::warn!(
            issues = trace.inconsistency_count(),
            "Story has inconsistencies; run `storyweave inspect` for details"
        );
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    render(&reader).await;

    loop {
        print!("\n> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }
        let Some(command) = ReaderCommand::parse(&line) else {
            println!("  Unrecognized input '{}'", line.trim());
            continue;
        };

        let outcome = match command {
            ReaderCommand::Quit => break,
            ReaderCommand::Back => reader.go_back().await,
            ReaderCommand::Restart => reader.restart().await,
            ReaderCommand::Choose(number) => match choice_target(&reader, number).await {
                Some(target) => reader.advance(target.as_deref()).await,
                None => {
                    println!("  There is no choice {}", number);
                    continue;
                }
            },
            ReaderCommand::NextImage => {
                reader.next_image().await;
                render_image(&reader).await;
                continue;
            }
            ReaderCommand::Debug => {
                let snapshot = reader.debug_snapshot().await;
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
                println!("  history: {}", snapshot.history_line());
                continue;
            }
        };

        match outcome {
            NavigationOutcome::Scheduled(kind) => {
                tracing::debug!(%kind, "Waiting for transition");
                if let Some(Err(e)) = reader.settle().await {
                    println!("  ⚠️  {}", e);
                }
                render(&reader).await;
            }
            NavigationOutcome::Rejected(reason) => println!("  ({})", reason),
        }
    }

    reader.cancel_pending().await;
    Ok(())
}

/// Target of the nth visible choice, or `None` if there is no such choice.
async fn choice_target(reader: &StoryReader, number: usize) -> Option<Option<String>> {
    match reader.controls().await {
        PageControls::Choices(choices) => choices
            .into_iter()
            .nth(number - 1)
            .map(|choice| choice.target),
        PageControls::Restart | PageControls::EndOfBranch => None,
    }
}

async fn render(reader: &StoryReader) {
    let Some(page) = reader.current_page().await else {
        return;
    };

    println!("\n{}", "═".repeat(60));
    match page.page_number() {
        Some(number) => println!("{}  (page {})", page.display_title(), number),
        None => println!("{}", page.display_title()),
    }
    println!("{}", "─".repeat(60));
    println!("{}", page.content());
    render_image(reader).await;
    println!();

    match reader.controls().await {
        PageControls::Choices(choices) => {
            for (i, choice) in choices.iter().enumerate() {
                if choice.enabled {
                    println!("  [{}] {}", i + 1, choice.text);
                } else {
                    println!("  [{}] {} (closed)", i + 1, choice.text);
                }
            }
        }
        PageControls::Restart => {
            println!("  ✦ The End ✦");
            println!("  [r] Start again");
        }
        PageControls::EndOfBranch => println!("  End of this branch"),
    }
    if reader.can_go_back().await {
        println!("  [b] Back");
    }
}

async fn render_image(reader: &StoryReader) {
    let Some(page) = reader.current_page().await else {
        return;
    };
    let index = reader.image_index().await;
    if let Some(image) = page.images().get(index) {
        if page.image_count() > 1 {
            println!("  🖼  {} ({}/{}, [i] next)", image, index + 1, page.image_count());
        } else {
            println!("  🖼  {}", image);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_reader_commands() {
        assert_eq!(ReaderCommand::parse("2"), Some(ReaderCommand::Choose(2)));
        assert_eq!(ReaderCommand::parse(" B "), Some(ReaderCommand::Back));
        assert_eq!(ReaderCommand::parse("restart"), Some(ReaderCommand::Restart));
        assert_eq!(ReaderCommand::parse("q"), Some(ReaderCommand::Quit));
        assert_eq!(ReaderCommand::parse("0"), None);
        assert_eq!(ReaderCommand::parse("jump"), None);
    }
}
