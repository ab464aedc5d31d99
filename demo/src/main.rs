//! Renders `<App/>` and then `<App name="B"/>` into the same container, showing that the second
//! render patches the tree in place.

use stack_reconciler::logging;
use stack_reconciler::memory::MemoryDomError;
use stack_reconciler::prelude::*;
use tracing::info;

fn app(props: &Props) -> Element {
    Element::tag("div")
        .child(
            Element::tag("h1")
                .child("hello react! ")
                .child(props.get_str("name").unwrap_or("").to_owned()),
        )
        .child(Element::tag("h3").child("my own react!"))
}

fn main() -> Result<(), stack_reconciler::Error<MemoryDomError>> {
    logging::init();

    let mut renderer = Renderer::new(MemoryDom::new());
    let root = renderer.backend_mut().create_container("root");

    renderer.render(Element::function(app), &root)?;
    let first = renderer.backend_mut().take_journal();
    info!(mutations = first.len(), "initial render");
    println!("{}", renderer.backend().to_html(root).map_err(stack_reconciler::Error::Backend)?);

    renderer.render(Element::function(app).attr("name", "B"), &root)?;
    let second = renderer.backend_mut().take_journal();
    info!(mutations = second.len(), "update");
    for mutation in &second {
        info!(?mutation, "applied");
    }
    println!("{}", renderer.backend().to_html(root).map_err(stack_reconciler::Error::Backend)?);

    Ok(())
}
