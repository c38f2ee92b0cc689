//! # CLI Layer
//!
//! This module is **one possible UI client** for carousel, not the application itself.
//!
//! The CLI layer is the **only** place in the codebase that:
//! - Knows about terminal I/O (stdout, stderr, stdin)
//! - Handles argument parsing
//! - Formats output for human consumption
//!
//! ## Responsibilities
//!
//! 1. **Argument Parsing**: shell arguments to typed commands via clap
//! 2. **Context Setup**: data directory, configuration, asset catalog, API
//! 3. **Tokens**: the CLI is a trusted local operator; it signs a token for
//!    each mutation with the installation secret and the API verifies it
//! 4. **API Dispatch**: call the matching `CarouselApi` method
//! 5. **Output Formatting**: `CmdResult` to terminal output
//!
//! Rendered HTML goes to stdout untouched so it can be piped; logs go to stderr.

use super::render::{
    print_messages, render_fragments, render_slider_detail, render_slider_list, render_text_list,
};
use super::setup::{
    command_help, grouped_help, Cli, Commands, MiscCommands, RenderCommands, SlideCommands,
    SliderCommands,
};
use carousel::api::CarouselApi;
use carousel::assets::AssetCatalog;
use carousel::commands::config::ConfigAction;
use carousel::config::CarouselConfig;
use carousel::error::{CarouselError, Result, ValidationError};
use carousel::form::FormInput;
use carousel::security::{Action, SignedTokenGate};
use carousel::store::fs::FileStore;
use directories::ProjectDirs;
use std::io::Read;
use std::path::{Path, PathBuf};

const DATA_DIR_ENV: &str = "CAROUSEL_DATA_DIR";

struct AppContext {
    api: CarouselApi<FileStore, AssetCatalog, SignedTokenGate>,
    signer: SignedTokenGate,
    data_dir: PathBuf,
}

impl AppContext {
    fn token(&self, action: Action) -> String {
        self.signer.issue(action)
    }
}

pub fn run(cli: Cli) -> Result<()> {
    if cli.help {
        return handle_help(cli.invoked);
    }

    if let Some(Commands::Misc(MiscCommands::Help { command })) = &cli.command {
        return handle_help(command.clone());
    }

    let mut ctx = init_context(&cli)?;

    match cli.command {
        Some(Commands::Slider(cmd)) => match cmd {
            SliderCommands::List => handle_list(&ctx),
            SliderCommands::Show { slider } => handle_show(&ctx, &slider),
            SliderCommands::Create { slider, fields } => handle_create(&mut ctx, &slider, &fields),
            SliderCommands::Update { slider, fields } => handle_update(&mut ctx, &slider, &fields),
            SliderCommands::Delete { slider } => handle_delete(&mut ctx, &slider),
        },
        Some(Commands::Slide(cmd)) => match cmd {
            SlideCommands::AddSlide { slider, fields } => {
                handle_add_slide(&mut ctx, &slider, &fields)
            }
            SlideCommands::EditSlide { id, fields } => handle_edit_slide(&mut ctx, id, &fields),
            SlideCommands::RemoveSlide { id } => handle_remove_slide(&mut ctx, id),
            SlideCommands::Reorder { slider, ids } => handle_reorder(&mut ctx, &slider, &ids),
            SlideCommands::Toggle { id, on, off } => {
                let active = match (on, off) {
                    (true, _) => Some(true),
                    (_, true) => Some(false),
                    _ => None,
                };
                handle_toggle(&mut ctx, id, active)
            }
        },
        Some(Commands::Render(cmd)) => match cmd {
            RenderCommands::Render { sliders } => handle_render(&ctx, &sliders),
            RenderCommands::RenderPage { file } => handle_render_page(&ctx, &file),
        },
        Some(Commands::Misc(cmd)) => match cmd {
            MiscCommands::Doctor => handle_doctor(&mut ctx),
            MiscCommands::Config { key, value } => handle_config(&ctx, key, value),
            MiscCommands::Help { command } => handle_help(command),
        },
        None => handle_list(&ctx),
    }
}

/// `--data-dir`, then `$CAROUSEL_DATA_DIR`, then the platform data directory.
fn resolve_data_dir(cli: &Cli) -> Result<PathBuf> {
    if let Some(dir) = &cli.data_dir {
        return Ok(dir.clone());
    }
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    ProjectDirs::from("com", "carousel", "carousel")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| CarouselError::Store("Could not determine a data directory".to_string()))
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let data_dir = resolve_data_dir(cli)?;
    std::fs::create_dir_all(&data_dir)?;
    tracing::debug!(data_dir = %data_dir.display(), "using data directory");

    let mut config = CarouselConfig::load(&data_dir)?;
    if config.ensure_secret() {
        config.save(&data_dir)?;
        tracing::info!("generated token secret");
    }

    let assets =
        AssetCatalog::load(&data_dir)?.with_url_template(config.asset_url_template.clone());
    let store = FileStore::new(data_dir.clone());
    let api = CarouselApi::new(store, assets, SignedTokenGate::new(&config.token_secret))?
        .with_embed_tag(config.embed_tag.clone());

    Ok(AppContext {
        api,
        signer: SignedTokenGate::new(&config.token_secret),
        data_dir,
    })
}

fn parse_fields(fields: &[String]) -> Result<FormInput> {
    FormInput::from_pairs(fields).map_err(|e| CarouselError::Validation(ValidationError::new(e)))
}

fn handle_list(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.list_sliders()?;
    print!("{}", render_slider_list(&result.listed_sliders));
    print_messages(&result.messages);
    Ok(())
}

fn handle_show(ctx: &AppContext, slider: &str) -> Result<()> {
    let result = ctx.api.show_slider(slider)?;
    if let Some(summary) = result.listed_sliders.first() {
        print!("{}", render_slider_detail(summary, &result.listed_slides));
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_create(ctx: &mut AppContext, slider: &str, fields: &[String]) -> Result<()> {
    let mut form = parse_fields(fields)?;
    form.insert("id", slider);
    if !form.contains("name") {
        form.insert("name", slider);
    }
    let token = ctx.token(Action::CreateSlider);
    let result = ctx.api.create_slider(&token, &form)?;
    print_messages(&result.messages);
    if let Some(created) = result.affected_sliders.first() {
        println!("Embed with: {}", created.embed_snippet(ctx.api.embed_tag()));
    }
    Ok(())
}

fn handle_update(ctx: &mut AppContext, slider: &str, fields: &[String]) -> Result<()> {
    let form = parse_fields(fields)?;
    let token = ctx.token(Action::UpdateSlider);
    let result = ctx.api.update_slider(&token, slider, &form)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_delete(ctx: &mut AppContext, slider: &str) -> Result<()> {
    let token = ctx.token(Action::DeleteSlider);
    let result = ctx.api.delete_slider(&token, slider)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_add_slide(ctx: &mut AppContext, slider: &str, fields: &[String]) -> Result<()> {
    let mut form = parse_fields(fields)?;
    form.insert("slider_id", slider);
    let token = ctx.token(Action::SaveSlide);
    let result = ctx.api.add_slide(&token, &form)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_edit_slide(ctx: &mut AppContext, id: u64, fields: &[String]) -> Result<()> {
    let form = parse_fields(fields)?;
    let token = ctx.token(Action::SaveSlide);
    let result = ctx.api.edit_slide(&token, id, &form)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_remove_slide(ctx: &mut AppContext, id: u64) -> Result<()> {
    let token = ctx.token(Action::DeleteSlide);
    let result = ctx.api.remove_slide(&token, id)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_reorder(ctx: &mut AppContext, slider: &str, ids: &[u64]) -> Result<()> {
    let token = ctx.token(Action::ReorderSlides);
    let result = ctx.api.reorder_slides(&token, slider, ids)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_toggle(ctx: &mut AppContext, id: u64, active: Option<bool>) -> Result<()> {
    let token = ctx.token(Action::ToggleSlide);
    let result = ctx.api.toggle_slide(&token, id, active)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_render(ctx: &AppContext, sliders: &[String]) -> Result<()> {
    let result = ctx.api.render(sliders)?;
    print!("{}", render_fragments(&result.fragments));
    Ok(())
}

fn handle_render_page(ctx: &AppContext, file: &str) -> Result<()> {
    let page = read_page(file)?;
    let result = ctx.api.render_page(&page)?;
    if let Some(expanded) = result.page {
        print!("{}", expanded);
    }
    Ok(())
}

fn read_page(file: &str) -> Result<String> {
    if file == "-" {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        return Ok(buffer);
    }
    Ok(std::fs::read_to_string(Path::new(file))?)
}

fn handle_doctor(ctx: &mut AppContext) -> Result<()> {
    let result = ctx.api.doctor()?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_config(ctx: &AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    let show_all = key.is_none();
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(k), None) => ConfigAction::ShowKey(k),
        (Some(k), Some(v)) => ConfigAction::Set(k, v),
    };

    let result = ctx.api.config(&ctx.data_dir, action)?;
    if show_all {
        let lines: Vec<String> = result
            .config
            .iter()
            .flat_map(|config| config.entries())
            .map(|(k, v)| format!("{} = {}", k, v))
            .collect();
        print!("{}", render_text_list(&lines, "No configuration values."));
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_help(command: Option<String>) -> Result<()> {
    match command.as_deref().map(|name| (name, command_help(name))) {
        None => print!("{}", grouped_help()),
        Some((_, Some(help))) => print!("{}", help),
        Some((name, None)) => {
            eprintln!("Unknown command: {}\n", name);
            print!("{}", grouped_help());
        }
    }
    Ok(())
}
