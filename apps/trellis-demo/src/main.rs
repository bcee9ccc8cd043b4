//! Drives a small document through the run loop against the headless backend
//! and prints every batch the backend received as JSON.

use std::error::Error;

use trellis_dom::{
    Align, AlignProp, DimProp, Dimension, Document, ElementRef, NodeId, ParentNode, TreeNode,
};
use trellis_shell::{
    App, AppConfig, ShellError, WindowConfig, Windows, get_app, request_animation_frame, run_until,
};
use trellis_traits::{HeadlessBackend, NativeEvent, WindowId};

const FRAMES: u32 = 3;

fn on_event(
    doc: &mut Document,
    target: Option<NodeId>,
    event: &NativeEvent,
) -> Result<(), ShellError> {
    if let (NativeEvent::MouseDown { .. }, Some(target)) = (event, target) {
        target.set_text_content(doc, "pressed")?;
    }
    Ok(())
}

fn build(doc: &mut Document) -> Result<(ElementRef, ElementRef), ShellError> {
    let column = doc.create_element("column");
    let label = doc.create_element("label");
    let button = doc.create_element("button");

    column.set_align(doc, AlignProp::AlignItems, Align::Center)?;
    button.set_dimension(doc, DimProp::Width, Dimension::Points(120.0))?;

    doc.root().append(doc, [column])?;
    column.append(doc, [label, button])?;
    label.set_text_content(doc, "frame 0")?;
    button.set_text_content(doc, "press me")?;
    Ok((label, button))
}

fn animate(window: WindowId, label: ElementRef, frame: u32) -> Result<(), ShellError> {
    request_animation_frame(move |windows: &mut Windows, timestamp| {
        let doc = windows
            .get_mut(window)
            .ok_or(ShellError::UnknownWindow(window))?
            .document_mut();
        label.set_text_content(doc, &format!("frame {frame} at {timestamp:.1}ms"))?;
        if frame < FRAMES {
            animate(window, label, frame + 1)?;
        }
        Ok(())
    })
}

fn main() -> Result<(), Box<dyn Error>> {
    #[cfg(feature = "tracing")]
    tracing_subscriber::fmt::init();

    let backend = HeadlessBackend::new();
    let app = get_app(|| App::new(backend.clone(), AppConfig::default()));

    let (window, button_surface) = {
        let mut app = app.borrow_mut();
        let window = app.create_window_with(WindowConfig::with_handler(on_event))?;
        let id = window.id();
        let doc = window.document_mut();
        let (label, button) = build(doc)?;
        #[cfg(feature = "tracing")]
        doc.print_tree();
        animate(id, label, 1)?;
        (id, button.surface(doc))
    };
    backend.push_event(window, NativeEvent::MouseDown { target: button_surface });

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let mut ticks = 0;
    rt.block_on(run_until(&app, |_| {
        ticks += 1;
        ticks > FRAMES + 1
    }));

    for (window, batch) in backend.take_updates() {
        println!("{window}: {}", serde_json::to_string(&batch)?);
    }
    Ok(())
}
