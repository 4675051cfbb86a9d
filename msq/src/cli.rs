use clap::{Parser, ValueEnum};
use songsearch::CompileOptions;

#[derive(Parser)]
#[clap(about = "Inspect how a song search query is parsed, compiled and split")]
pub struct Cli {
    /// Identity used for tag lookups and private playlists.
    #[clap(long, env = "MSQ_VIEWER")]
    pub viewer: Option<String>,
    /// Emit `$n` placeholders instead of `?`.
    #[clap(long, default_value = "false")]
    pub numbered: bool,
    /// Parameters already bound before the predicate; implies `--numbered`.
    #[clap(long)]
    pub start: Option<u32>,
    #[clap(long, value_enum, default_value_t = Mode::Compile)]
    pub mode: Mode,
    /// Print JSON instead of the plain listing.
    #[clap(long, default_value = "false")]
    pub json: bool,
    /// Query to run once. Without it, queries are read from stdin.
    pub query: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Syntax tree only.
    Ast,
    /// Predicate with the free-text fallback applied.
    Compile,
    /// Semantic split plus the predicate for the remainder.
    Plan,
}

impl Cli {
    pub fn compile_options(&self) -> CompileOptions {
        let mut options = CompileOptions {
            viewer: self.viewer.clone(),
            ..CompileOptions::default()
        };
        if self.numbered || self.start.is_some() {
            options = options.numbered(self.start.unwrap_or(0));
        }
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use songsearch::PlaceholderStyle;

    #[test]
    fn start_implies_numbered() {
        let cli = Cli::parse_from(["msq", "--start", "3", "a:x"]);
        assert_eq!(
            cli.compile_options().placeholders,
            PlaceholderStyle::Numbered { start: 3 }
        );
        assert_eq!(cli.query.as_deref(), Some("a:x"));
    }

    #[test]
    fn start_outside_the_placeholder_range_is_rejected() {
        assert!(Cli::try_parse_from(["msq", "--start", "99999999999", "a:x"]).is_err());
        assert!(Cli::try_parse_from(["msq", "--start", "-1", "a:x"]).is_err());

        let cli = Cli::parse_from(["msq", "--start", "4294967295", "a:x"]);
        let predicate = songsearch::compile_query("a:x", &cli.compile_options()).unwrap();
        assert_eq!(predicate.sql, "artist LIKE $4294967296");
    }

    #[test]
    fn defaults_to_question_marks() {
        let cli = Cli::parse_from(["msq", "--viewer", "7"]);
        let options = cli.compile_options();
        assert_eq!(options.placeholders, PlaceholderStyle::QuestionMark);
        assert_eq!(options.viewer.as_deref(), Some("7"));
        assert_eq!(cli.mode, Mode::Compile);
        assert!(cli.query.is_none());
    }

    #[test]
    fn mode_is_parsed_from_lowercase() {
        let cli = Cli::parse_from(["msq", "--mode", "plan", "--json", "ai:calm"]);
        assert_eq!(cli.mode, Mode::Plan);
        assert!(cli.json);
    }
}
