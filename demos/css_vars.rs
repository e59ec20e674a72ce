use storyviz::{DiagramConfig, DiagramKind, RenderOptions, render_svg};

fn main() {
    let config = DiagramConfig::new(DiagramKind::Circuit).with_title("Series Circuit");

    // Render with CSS variables so a host page can restyle the palette
    let options = RenderOptions {
        css_variables: true,
        ..Default::default()
    };
    let svg = render_svg(&config, 45, &options).expect("render failed");

    println!("{}", svg);
}
