//! Image loading with a request-generation guard.
//!
//! Each load carries the generation it was issued under; completions are
//! applied by the component only while that generation is still current, so
//! superseded loads can finish in any order without clobbering state.

use crate::component::NaturalSize;
use crate::Inner;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys::HtmlImageElement;

/// Start loading `src`, reporting the outcome back to the component.
pub fn start_load(inner: &Rc<RefCell<Inner>>, src: &str, generation: u64) -> Result<(), JsValue> {
    let image = HtmlImageElement::new()?;

    let onload = {
        let inner = Rc::clone(inner);
        let image = image.clone();
        Closure::wrap(Box::new(move || {
            let natural = NaturalSize {
                width: image.natural_width() as f64,
                height: image.natural_height() as f64,
            };
            let applied = inner
                .borrow_mut()
                .component
                .image_loaded(generation, natural);
            if applied {
                crate::sync(&inner);
            }
        }) as Box<dyn FnMut()>)
    };

    let onerror = {
        let inner = Rc::clone(inner);
        Closure::wrap(Box::new(move || {
            let applied = inner.borrow_mut().component.image_failed(generation);
            if applied {
                crate::sync(&inner);
            }
        }) as Box<dyn FnMut()>)
    };

    image.set_onload(Some(onload.as_ref().unchecked_ref()));
    image.set_onerror(Some(onerror.as_ref().unchecked_ref()));
    // The browser owns the image element from here; the handlers must
    // outlive this scope.
    onload.forget();
    onerror.forget();

    image.set_src(src);
    Ok(())
}
