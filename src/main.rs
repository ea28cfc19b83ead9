use site_shell::components::app::App;

fn main() {
    yew::Renderer::<App>::new().render();
}
