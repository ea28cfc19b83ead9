use yew::prelude::*;

use crate::model::{self, Region};

/// Repository cards, initially in hue order (matching the default sort
/// radio); reordering afterwards happens directly on the DOM.
#[function_component(RegionList)]
pub fn region_list() -> Html {
    let mut regions = model::regions();
    regions.sort_by_key(|r| r.hue_key());
    html! {
        <div class="region_container">
            { for regions.iter().map(region_card) }
        </div>
    }
}

fn region_card(region: &Region) -> Html {
    html! {
        <div class="region">
            <div
                class="color_indicator"
                style={format!("border-left-color: {}", region.color)}
            ></div>
            <div class="region_title">
                <a class="rainbow_underline" href={format!("/{}", region.name)}>
                    <span>{ region.name_full }</span>
                </a>
            </div>
            <div class="region_description">
                { region.description }
                <div class="region_description_tags">
                    { for region.tags.iter().map(|tag| html! {
                        <a class="region_description_tag"><span>{ *tag }</span></a>
                    }) }
                </div>
            </div>
            <div class="region_info">{ region.info }</div>
        </div>
    }
}
