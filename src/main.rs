mod config;
mod error;
mod markup;
mod normalize;
mod prefs;
mod render;
mod solver;
mod upload;

use std::path::PathBuf;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use crate::prefs::FilePrefStore;
use crate::render::{RenderContext, Theme};
use crate::solver::SolverClient;

struct Args {
    similar: bool,
    image: Option<PathBuf>,
    theme: Option<Theme>,
    problem: Option<String>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Args {
    let mut parsed = Args {
        similar: false,
        image: None,
        theme: None,
        problem: None,
    };
    let mut words: Vec<String> = Vec::new();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--similar" => parsed.similar = true,
            "--image" => parsed.image = args.next().map(PathBuf::from),
            "--dark" => parsed.theme = Some(Theme::Dark),
            "--light" => parsed.theme = Some(Theme::Light),
            _ => words.push(arg),
        }
    }
    if !words.is_empty() {
        parsed.problem = Some(words.join(" "));
    }
    parsed
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = parse_args(std::env::args().skip(1));

    let config = config::load_config()?;
    tracing::info!(solver_url = %config.solver_url, "Solver configured");

    let mut store = FilePrefStore::new(config.prefs_file.clone());
    let theme = match args.theme {
        Some(theme) => {
            theme.save(&mut store)?;
            theme
        }
        None => Theme::load(&mut store),
    };
    let ctx = RenderContext::new(theme);
    tracing::info!(theme = %theme, "Theme configured");

    let client = SolverClient::new(&config)?;

    if args.similar {
        let Some(problem) = args.problem else {
            anyhow::bail!("Usage: solvemark --similar <problem text>");
        };
        match client.similar(&problem).await {
            Ok(items) => {
                let list = render::similar_list(&items);
                if list.is_empty() {
                    println!("{}", ctx.container("<div>No similar problems found.</div>"));
                } else {
                    let body = format!("<strong>Similar Problems:</strong>{list}");
                    println!("{}", ctx.container(&body));
                }
            }
            Err(e) => {
                tracing::error!("Similar problems failed: {e}");
                println!("{}", ctx.container(&render::error_block(&e)));
            }
        }
        return Ok(());
    }

    let result = match (&args.image, &args.problem) {
        (Some(path), _) => client.solve_image(path).await,
        (None, Some(problem)) => client.solve_text(problem).await,
        (None, None) => {
            anyhow::bail!(
                "Usage: solvemark [--similar] [--image PATH] [--dark|--light] <problem text>"
            );
        }
    };

    match result {
        Ok(solved) => {
            let body = format!(
                "<div class=\"problem\">{}</div><div class=\"solution\">{}</div>",
                render::fragment(&solved.problem),
                render::fragment(&solved.solution)
            );
            println!("{}", ctx.container(&body));
        }
        Err(e) => {
            tracing::error!("Solve failed: {e}");
            println!("{}", ctx.container(&render::error_block(&e)));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_args_problem_words_joined() {
        let args = parse_args(["solve", "x", "+", "1"].map(String::from).into_iter());
        assert_eq!(args.problem.as_deref(), Some("solve x + 1"));
        assert!(!args.similar);
    }

    #[test]
    fn test_parse_args_flags() {
        let args = parse_args(
            ["--similar", "--dark", "--image", "/tmp/p.png", "question"]
                .map(String::from)
                .into_iter(),
        );
        assert!(args.similar);
        assert_eq!(args.theme, Some(Theme::Dark));
        assert_eq!(args.image.as_deref(), Some(std::path::Path::new("/tmp/p.png")));
        assert_eq!(args.problem.as_deref(), Some("question"));
    }

    #[test]
    fn test_parse_args_empty() {
        let args = parse_args(std::iter::empty());
        assert!(args.problem.is_none());
        assert!(args.image.is_none());
        assert!(args.theme.is_none());
    }
}
