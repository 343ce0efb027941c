//! Browser entry point: the scene on one canvas, the view cube on another.
//!
//! ```js
//! import init, { start } from "./viewcube.js";
//! await init();
//! await start("scene", "view-cube", "#home");
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, EventTarget, HtmlCanvasElement, KeyboardEvent, MouseEvent, WheelEvent};

use crate::engine::command::ViewerCommand;
use crate::error::ViewCubeError;
use crate::input::{InputEvent, MouseButton};
use crate::options::Options;
use crate::util::frame_timing::FrameTiming;
use crate::ViewerEngine;

type SharedEngine = Rc<RefCell<ViewerEngine>>;

/// Pixels of `WheelEvent.deltaY` per wheel step.
const WHEEL_STEP: f64 = 100.0;

fn js_error(e: JsValue) -> ViewCubeError {
    ViewCubeError::Web(format!("{e:?}"))
}

/// Start the viewer on the canvas with id `canvas_id`, draw the view cube on
/// `cube_canvas_id`, and reset the camera when the element matching
/// `home_selector` is clicked.
///
/// # Errors
///
/// Rejects if a canvas is missing or the GPU cannot be initialized.
#[wasm_bindgen]
pub async fn start(
    canvas_id: String,
    cube_canvas_id: String,
    home_selector: String,
) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    run(&canvas_id, &cube_canvas_id, &home_selector)
        .await
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

async fn run(
    canvas_id: &str,
    cube_canvas_id: &str,
    home_selector: &str,
) -> Result<(), ViewCubeError> {
    let window = web_sys::window()
        .ok_or_else(|| ViewCubeError::Web("no global window".into()))?;
    let document = window
        .document()
        .ok_or_else(|| ViewCubeError::Web("no document".into()))?;
    let canvas = canvas_by_id(&document, canvas_id)?;
    let cube_canvas = canvas_by_id(&document, cube_canvas_id)?;

    let options = Options::default();
    let ratio = options.render.pixel_ratio(window.device_pixel_ratio());
    let size = fit_canvas(&canvas, ratio);
    let cube_size = fit_canvas(&cube_canvas, ratio);
    let target_fps = options.render.target_fps;

    let mut engine = ViewerEngine::new(
        wgpu::SurfaceTarget::Canvas(canvas.clone()),
        size,
        ratio,
        options,
    )
    .await?;
    if let Err(e) = engine.attach_gizmo_surface(
        wgpu::SurfaceTarget::Canvas(cube_canvas.clone()),
        cube_size,
    ) {
        log::warn!("view cube canvas unavailable ({e}), drawing it on the main canvas");
    }
    let engine: SharedEngine = Rc::new(RefCell::new(engine));

    bind_scene_canvas(&canvas, &engine)?;
    bind_cube_canvas(&cube_canvas, &engine)?;
    bind_home(&document, home_selector, &engine)?;
    bind_window(&window, &canvas, &cube_canvas, &engine)?;
    start_animation_loop(engine, target_fps)?;
    log::info!("viewer started on #{canvas_id} with cube on #{cube_canvas_id}");
    Ok(())
}

fn canvas_by_id(document: &Document, id: &str) -> Result<HtmlCanvasElement, ViewCubeError> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| ViewCubeError::Web(format!("no element #{id}")))?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| ViewCubeError::Web(format!("#{id} is not a canvas")))
}

/// Size the canvas backing store to its CSS size times `ratio`.
fn fit_canvas(canvas: &HtmlCanvasElement, ratio: f64) -> (u32, u32) {
    let width = (f64::from(canvas.client_width()) * ratio).round().max(1.0) as u32;
    let height = (f64::from(canvas.client_height()) * ratio).round().max(1.0) as u32;
    canvas.set_width(width);
    canvas.set_height(height);
    (width, height)
}

/// Register `handler` for `name` events on `target` for the page lifetime.
fn listen(
    target: &EventTarget,
    name: &str,
    handler: impl FnMut(web_sys::Event) + 'static,
) -> Result<(), ViewCubeError> {
    let closure = Closure::<dyn FnMut(web_sys::Event)>::new(handler);
    target
        .add_event_listener_with_callback(
            name,
            closure.as_ref().unchecked_ref::<js_sys::Function>(),
        )
        .map_err(js_error)?;
    closure.forget();
    Ok(())
}

/// Pointer position in physical pixels relative to the event target.
fn pointer_position(event: &MouseEvent, ratio: f64) -> (f32, f32) {
    (
        (f64::from(event.offset_x()) * ratio) as f32,
        (f64::from(event.offset_y()) * ratio) as f32,
    )
}

fn bind_scene_canvas(
    canvas: &HtmlCanvasElement,
    engine: &SharedEngine,
) -> Result<(), ViewCubeError> {
    let e = Rc::clone(engine);
    listen(canvas, "mousemove", move |event| {
        if let Some(event) = event.dyn_ref::<MouseEvent>() {
            let mut engine = e.borrow_mut();
            let (x, y) = pointer_position(event, engine.scale_factor());
            let _ = engine.handle_input(InputEvent::CursorMoved { x, y });
        }
    })?;

    listen_buttons(canvas, "mousedown", true, engine)?;

    let e = Rc::clone(engine);
    listen(canvas, "mouseleave", move |_| {
        let _ = e.borrow_mut().handle_input(InputEvent::CursorLeft);
    })?;

    let e = Rc::clone(engine);
    listen(canvas, "wheel", move |event| {
        if let Some(event) = event.dyn_ref::<WheelEvent>() {
            event.prevent_default();
            let delta = (-event.delta_y() / WHEEL_STEP) as f32;
            let _ = e.borrow_mut().handle_input(InputEvent::Scroll { delta });
        }
    })?;

    listen(canvas, "contextmenu", |event| event.prevent_default())
}

/// Forward `name` mouse events on `target` as button presses or releases.
fn listen_buttons(
    target: &EventTarget,
    name: &str,
    pressed: bool,
    engine: &SharedEngine,
) -> Result<(), ViewCubeError> {
    let e = Rc::clone(engine);
    listen(target, name, move |event| {
        let Some(event) = event.dyn_ref::<MouseEvent>() else {
            return;
        };
        let Some(button) = MouseButton::from_dom(event.button()) else {
            return;
        };
        let mut engine = e.borrow_mut();
        let _ = engine.handle_input(InputEvent::ModifiersChanged {
            shift: event.shift_key(),
        });
        let _ = engine.handle_input(InputEvent::MouseButton { button, pressed });
    })
}

fn bind_cube_canvas(
    canvas: &HtmlCanvasElement,
    engine: &SharedEngine,
) -> Result<(), ViewCubeError> {
    let e = Rc::clone(engine);
    listen(canvas, "mousemove", move |event| {
        if let Some(event) = event.dyn_ref::<MouseEvent>() {
            let mut engine = e.borrow_mut();
            let (x, y) = pointer_position(event, engine.scale_factor());
            let _ = engine.handle_gizmo_pointer(x, y);
        }
    })?;

    let e = Rc::clone(engine);
    listen(canvas, "mouseleave", move |_| {
        let _ = e.borrow_mut().handle_gizmo_pointer_left();
    })?;

    let e = Rc::clone(engine);
    listen(canvas, "click", move |_| {
        let _ = e.borrow_mut().handle_gizmo_click();
    })
}

fn bind_home(
    document: &Document,
    selector: &str,
    engine: &SharedEngine,
) -> Result<(), ViewCubeError> {
    let Some(home) = document.query_selector(selector).map_err(js_error)? else {
        log::warn!("no home control matches {selector:?}");
        return Ok(());
    };
    let e = Rc::clone(engine);
    listen(&home, "click", move |_| {
        let _ = e.borrow_mut().execute(ViewerCommand::ResetView);
    })
}

fn bind_window(
    window: &web_sys::Window,
    canvas: &HtmlCanvasElement,
    cube_canvas: &HtmlCanvasElement,
    engine: &SharedEngine,
) -> Result<(), ViewCubeError> {
    // Releases outside the canvas still end a drag.
    listen_buttons(window, "mouseup", false, engine)?;

    let e = Rc::clone(engine);
    listen(window, "keydown", move |event| {
        if let Some(event) = event.dyn_ref::<KeyboardEvent>() {
            if !event.repeat() {
                let _ = e.borrow_mut().handle_key_press(&event.code());
            }
        }
    })?;

    let e = Rc::clone(engine);
    let canvas = canvas.clone();
    let cube_canvas = cube_canvas.clone();
    listen(window, "resize", move |_| {
        let Some(window) = web_sys::window() else {
            return;
        };
        let mut engine = e.borrow_mut();
        let ratio = engine
            .options()
            .render
            .pixel_ratio(window.device_pixel_ratio());
        engine.set_scale_factor(ratio);
        let (width, height) = fit_canvas(&canvas, ratio);
        engine.resize(width, height);
        let (width, height) = fit_canvas(&cube_canvas, ratio);
        engine.resize_gizmo_surface(width, height);
    })
}

fn request_animation_frame(
    callback: &Closure<dyn FnMut()>,
) -> Result<i32, ViewCubeError> {
    web_sys::window()
        .ok_or_else(|| ViewCubeError::Web("no global window".into()))?
        .request_animation_frame(callback.as_ref().unchecked_ref())
        .map_err(js_error)
}

/// Drive `update` + `render` from `requestAnimationFrame`.
fn start_animation_loop(engine: SharedEngine, target_fps: u32) -> Result<(), ViewCubeError> {
    let callback: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let next = Rc::clone(&callback);
    let mut frame_timing = FrameTiming::new(target_fps);

    *callback.borrow_mut() = Some(Closure::<dyn FnMut()>::new(move || {
        if frame_timing.should_render() {
            let dt = frame_timing.end_frame();
            let mut engine = engine.borrow_mut();
            let _ = engine.update(dt);
            match engine.render() {
                Ok(()) => {}
                Err(wgpu::SurfaceError::Outdated | wgpu::SurfaceError::Lost) => {
                    let (width, height) = engine.context.size();
                    engine.resize(width, height);
                }
                Err(e) => log::error!("render error: {e:?}"),
            }
        }
        if let Some(callback) = next.borrow().as_ref() {
            if let Err(e) = request_animation_frame(callback) {
                log::error!("animation loop stopped: {e}");
            }
        }
    }));

    if let Some(callback) = callback.borrow().as_ref() {
        let _ = request_animation_frame(callback)?;
    }
    Ok(())
}
