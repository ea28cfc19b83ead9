use yew::prelude::*;

const SECTIONS: [(&str, &str); 3] = [
    ("repositories", "Repositories"),
    ("gists", "Gists"),
    ("about", "About"),
];

/// Fixed top navigation. The sliding indicator under the active button is
/// positioned by the panel controller, not by yew.
#[function_component(NavBar)]
pub fn nav_bar() -> Html {
    html! {
        <nav class="content_nav">
            { for SECTIONS.iter().map(|(label, title)| html! {
                <a
                    class="content_nav_button rainbow_underline"
                    data-content={*label}
                    href={format!("#!content={label}")}
                >
                    <span class="rainbow_underline_inner"><span>{ *title }</span></span>
                </a>
            }) }
            <div class="content_nav_indicator"></div>
        </nav>
    }
}
