use yew::prelude::*;

use crate::model::SortMode;

/// Sort radios, the tag toggle, and the (initially empty) tag cloud. The
/// cloud is filled in after mount, once the region cards exist to count
/// tags from.
#[function_component(SettingsPanel)]
pub fn settings_panel() -> Html {
    html! {
        <div class="settings script_enabled">
            <div class="settings_sort">
                <span class="settings_sort_label">{ "sort by" }</span>
                { for [SortMode::Color, SortMode::Name].into_iter().map(|mode| html! {
                    <>
                        <input
                            type="radio"
                            name="sort-by"
                            class="radio settings_sort_by"
                            value={mode.as_str()}
                            data-is-default={mode.is_default().then_some("true")}
                            checked={mode.is_default()}
                        />
                        <span class="settings_sort_by_name">{ mode.as_str() }</span>
                    </>
                }) }
                <input type="checkbox" class="checkbox settings_sort_by_tags" />
                <span class="settings_sort_by_name">{ "tags" }</span>
            </div>
            <div class="settings_tags_container">
                <div class="settings_tags"></div>
            </div>
        </div>
    }
}
