use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use std::fmt::Write;
use std::path::PathBuf;

const ABOUT: &str = "Image carousels for your pages, managed from the command line";

/// Top-level help sections, in display order. Every visible subcommand
/// belongs to exactly one.
const HELP_SECTIONS: &[(&str, &[&str])] = &[
    ("Slider Commands", &["list", "show", "create", "update", "delete"]),
    (
        "Slide Commands",
        &["add-slide", "edit-slide", "remove-slide", "reorder", "toggle"],
    ),
    ("Render Commands", &["render", "render-page"]),
    ("Miscellaneous", &["doctor", "config", "help"]),
];

#[derive(Parser, Debug)]
#[command(
    name = "carousel",
    version = env!("CARGO_PKG_VERSION"),
    long_version = env!("CAROUSEL_LONG_VERSION"),
    about = ABOUT,
    disable_help_flag = true,
    disable_help_subcommand = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Data directory (defaults to $CAROUSEL_DATA_DIR, then the platform data dir)
    #[arg(short, long, global = true, value_name = "DIR", help_heading = "Options")]
    pub data_dir: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,

    /// Print help
    #[arg(short, long, global = true)]
    pub help: bool,

    /// Canonical name of the subcommand on the command line, aliases resolved.
    #[arg(skip)]
    pub invoked: Option<String>,
}

impl Cli {
    /// Parses the process arguments, exiting with clap's message on error.
    pub fn from_env() -> Self {
        let matches = Self::command().get_matches();
        let mut cli = Self::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());
        cli.invoked = matches.subcommand_name().map(str::to_string);
        cli
    }
}

pub fn grouped_help() -> String {
    let cmd = Cli::command();
    let mut out = String::new();
    let _ = writeln!(out, "{}\n", ABOUT);
    let _ = writeln!(out, "Usage: carousel [OPTIONS] <COMMAND> [ARGS]");

    for (heading, names) in HELP_SECTIONS {
        let _ = writeln!(out, "\n{}:", heading);
        for name in names.iter() {
            let about = cmd
                .find_subcommand(name)
                .and_then(|sc| sc.get_about())
                .map(|a| a.to_string())
                .unwrap_or_default();
            let _ = writeln!(out, "  {:<14} {}", name, about);
        }
    }

    let _ = writeln!(
        out,
        "\nFields are key=value pairs: carousel create home name=\"Home page\" interval=4000"
    );
    let _ = writeln!(out, "\nOptions:");
    for arg in cmd
        .get_arguments()
        .filter(|a| !a.is_hide_set() && a.get_id() != "version")
    {
        let (Some(short), Some(long)) = (arg.get_short(), arg.get_long()) else {
            continue;
        };
        let flag = match arg.get_value_names() {
            Some([value, ..]) => format!("-{}, --{} <{}>", short, long, value),
            _ => format!("-{}, --{}", short, long),
        };
        let help = arg.get_help().map(|h| h.to_string()).unwrap_or_default();
        let _ = writeln!(out, "  {:<22} {}", flag, help);
    }
    let _ = writeln!(out, "  {:<22} Print version", "-V, --version");
    out
}

/// Help for one subcommand by name or alias.
pub fn command_help(name: &str) -> Option<String> {
    let mut cmd = Cli::command();
    cmd.find_subcommand_mut(name)
        .map(|sc| sc.render_help().to_string())
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(flatten)]
    Slider(SliderCommands),

    #[command(flatten)]
    Slide(SlideCommands),

    #[command(flatten)]
    Render(RenderCommands),

    #[command(flatten)]
    Misc(MiscCommands),
}

#[derive(Subcommand, Debug)]
pub enum SliderCommands {
    /// List sliders with slide counts and embed snippets
    #[command(alias = "ls", display_order = 1)]
    List,

    /// Show a slider's settings and slides
    #[command(alias = "s", display_order = 2)]
    Show {
        /// Slider id
        slider: String,
    },

    /// Create a slider
    #[command(alias = "new", display_order = 3)]
    Create {
        /// Slider id (lowercase letters, numbers, '-' and '_')
        slider: String,

        /// Settings as key=value (name=, autoplay=, interval=, transition=, ...)
        #[arg(num_args = 0..)]
        fields: Vec<String>,
    },

    /// Change a slider's settings
    #[command(display_order = 4)]
    Update {
        /// Slider id
        slider: String,

        /// Settings as key=value
        #[arg(num_args = 0..)]
        fields: Vec<String>,
    },

    /// Delete a slider and all of its slides
    #[command(alias = "rm", display_order = 5)]
    Delete {
        /// Slider id
        slider: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum SlideCommands {
    /// Append a slide to a slider
    #[command(alias = "add", display_order = 10)]
    AddSlide {
        /// Slider id
        slider: String,

        /// Slide fields as key=value (image_id=, image_alt=, caption_title=, button_url=, ...)
        #[arg(num_args = 0..)]
        fields: Vec<String>,
    },

    /// Change a slide
    #[command(alias = "edit", display_order = 11)]
    EditSlide {
        /// Slide id
        id: u64,

        /// Slide fields as key=value
        #[arg(num_args = 0..)]
        fields: Vec<String>,
    },

    /// Remove a slide
    #[command(display_order = 12)]
    RemoveSlide {
        /// Slide id
        id: u64,
    },

    /// Set the display sequence of a slider's slides
    #[command(display_order = 13)]
    Reorder {
        /// Slider id
        slider: String,

        /// Every slide id of the slider, in the new sequence
        #[arg(required = true, num_args = 1..)]
        ids: Vec<u64>,
    },

    /// Enable or disable a slide (flips it without --on/--off)
    #[command(display_order = 14)]
    Toggle {
        /// Slide id
        id: u64,

        /// Enable the slide
        #[arg(long, conflicts_with = "off")]
        on: bool,

        /// Disable the slide
        #[arg(long)]
        off: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum RenderCommands {
    /// Print the HTML fragment of one or more sliders
    #[command(display_order = 20)]
    Render {
        /// Slider ids, rendered as one page
        #[arg(required = true, num_args = 1..)]
        sliders: Vec<String>,
    },

    /// Expand [carousel id="..."] placeholders in a page
    #[command(display_order = 21)]
    RenderPage {
        /// Page file, or - for stdin
        file: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum MiscCommands {
    /// Check and fix data inconsistencies
    #[command(display_order = 30)]
    Doctor,

    /// Get or set configuration
    #[command(display_order = 31)]
    Config {
        /// Configuration key (e.g., embed-tag)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },

    /// Print help for carousel or a subcommand
    #[command(display_order = 32)]
    Help {
        /// Subcommand to get help for
        command: Option<String>,
    },
}
