use crate::commands::{CmdMessage, CmdResult, SliderSummary};
use crate::error::Result;
use crate::model::Slider;
use crate::store::DataStore;

pub fn summarize<S: DataStore>(
    store: &S,
    slider: Slider,
    embed_tag: &str,
) -> Result<SliderSummary> {
    let total_slides = store.count_slides(&slider.id, false)?;
    let active_slides = store.count_slides(&slider.id, true)?;
    Ok(SliderSummary {
        embed: slider.embed_snippet(embed_tag),
        slider,
        total_slides,
        active_slides,
    })
}

pub fn run<S: DataStore>(store: &S, embed_tag: &str) -> Result<CmdResult> {
    let summaries = store
        .list_sliders()?
        .into_iter()
        .map(|slider| summarize(store, slider, embed_tag))
        .collect::<Result<Vec<_>>>()?;

    let mut result = CmdResult::default();
    if summaries.is_empty() {
        result.add_message(CmdMessage::info(
            "No sliders yet. Create one with: carousel create <id> name=<name>",
        ));
    }
    Ok(result.with_listed_sliders(summaries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::fixtures::StoreFixture;
    use crate::store::memory::InMemoryStore;

    #[test]
    fn lists_sliders_with_counts_and_snippet() {
        let store = StoreFixture::new()
            .with_slider("home")
            .with_slider("promo")
            .with_slides("home", 2)
            .with_slide_at("home", 9, false)
            .store;

        let result = run(&store, "carousel").unwrap();
        assert_eq!(result.listed_sliders.len(), 2);

        let home = &result.listed_sliders[0];
        assert_eq!(home.slider.id, "home");
        assert_eq!(home.total_slides, 3);
        assert_eq!(home.active_slides, 2);
        assert_eq!(home.embed, "[carousel id=\"home\"]");
        assert_eq!(result.listed_sliders[1].total_slides, 0);
    }

    #[test]
    fn empty_store_hints_at_create() {
        let store = InMemoryStore::new();
        let result = run(&store, "carousel").unwrap();
        assert!(result.listed_sliders.is_empty());
        assert!(result.messages[0].content.contains("carousel create"));
    }
}
