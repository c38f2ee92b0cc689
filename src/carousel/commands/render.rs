use crate::commands::CmdResult;
use crate::embed::expand_embeds;
use crate::error::{CarouselError, Result};
use crate::render::{Fragment, RenderContext, Renderer};
use crate::sanitize::sanitize_slider_id;
use crate::store::DataStore;

/// Renders one slider inside `ctx`. A missing slider is not an error here,
/// it renders as a diagnostic comment.
pub fn fragment<S: DataStore>(
    store: &S,
    renderer: &Renderer,
    ctx: &mut RenderContext,
    slider_id: &str,
) -> Result<Fragment> {
    let slider_id = sanitize_slider_id(slider_id);
    let slider = match store.get_slider(&slider_id) {
        Ok(slider) => Some(slider),
        Err(CarouselError::SliderNotFound(_)) => None,
        Err(e) => return Err(e),
    };
    let slides = match &slider {
        Some(slider) => store.list_slides(&slider.id, true)?,
        None => Vec::new(),
    };
    renderer.render(ctx, &slider_id, slider.as_ref(), &slides)
}

/// Renders each slider in turn as if they were embedded on the same page.
pub fn run<S: DataStore>(
    store: &S,
    renderer: &Renderer,
    slider_ids: &[String],
) -> Result<CmdResult> {
    let mut ctx = RenderContext::new();
    let fragments = slider_ids
        .iter()
        .map(|id| fragment(store, renderer, &mut ctx, id))
        .collect::<Result<Vec<_>>>()?;

    Ok(CmdResult {
        fragments,
        ..Default::default()
    })
}

/// Replaces every `[tag id="..."]` placeholder in `page`.
pub fn run_page<S: DataStore>(
    store: &S,
    renderer: &Renderer,
    page: &str,
    tag: &str,
) -> Result<CmdResult> {
    let mut ctx = RenderContext::new();
    let expanded = expand_embeds(page, tag, |id| fragment(store, renderer, &mut ctx, id))?;
    tracing::debug!(carousels = ctx.rendered(), "page expanded");

    Ok(CmdResult {
        page: Some(expanded),
        ..Default::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::EmptyReason;
    use crate::store::memory::fixtures::StoreFixture;

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn same_slider_twice_gets_distinct_instance_ids() {
        let store = StoreFixture::new().with_slider("home").with_slides("home", 2).store;
        let renderer = Renderer::new().unwrap();
        let result = run(&store, &renderer, &ids(&["home", "home"])).unwrap();

        let instance_ids: Vec<&str> = result
            .fragments
            .iter()
            .filter_map(|f| f.instance_id())
            .collect();
        assert_eq!(instance_ids, vec!["carousel-home-1", "carousel-home-2"]);
    }

    #[test]
    fn unknown_slider_renders_as_comment() {
        let store = StoreFixture::new().store;
        let renderer = Renderer::new().unwrap();
        let result = run(&store, &renderer, &ids(&["Ghost"])).unwrap();
        assert_eq!(
            result.fragments[0],
            Fragment::Empty(EmptyReason::NotFound("ghost".to_string()))
        );
    }

    #[test]
    fn slider_with_only_inactive_slides_is_empty() {
        let store = StoreFixture::new()
            .with_slider("home")
            .with_slide_at("home", 0, false)
            .store;
        let renderer = Renderer::new().unwrap();
        let result = run(&store, &renderer, &ids(&["home"])).unwrap();
        assert!(result.fragments[0].is_empty());
    }

    #[test]
    fn page_expansion_shares_one_context() {
        let store = StoreFixture::new().with_slider("home").with_slides("home", 1).store;
        let renderer = Renderer::new().unwrap();
        let page =
            "<h1>Hi</h1>\n[carousel id=\"home\"]\n<p>x</p>\n[carousel id=\"home\"]\n[carousel]";
        let result = run_page(&store, &renderer, page, "carousel").unwrap();
        let html = result.page.unwrap();

        assert!(html.starts_with("<h1>Hi</h1>\n"));
        assert!(html.contains("id=\"carousel-home-1\""));
        assert!(html.contains("id=\"carousel-home-2\""));
        assert!(html.contains("<!-- Carousel: No slider ID provided -->"));
        assert!(!html.contains("[carousel"));
    }
}
