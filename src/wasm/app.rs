use std::cell::RefCell;
use std::rc::{Rc, Weak};

use glam::Vec2;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlCanvasElement, HtmlElement, MouseEvent, PointerEvent, WheelEvent, Window};

use super::dom::{self, SectionDom};
use super::listeners::Listener;
use super::render::Renderer;
use crate::config;
use crate::cursor::CursorFlags;
use crate::error::{Error, Result};
use crate::section::Section;
use crate::stage::Stage;

const DEFAULT_CANVAS_ID: &str = "c";
const LINE_HEIGHT_PX: f64 = 16.0;

/// The three cursor layers; any of them may be missing from the page.
struct CursorDom {
    ring: Option<HtmlElement>,
    trail: Option<HtmlElement>,
    dot: Option<HtmlElement>,
}

impl CursorDom {
    fn find(root: &Element) -> Self {
        Self {
            ring: dom::query(root, ".cursor"),
            trail: dom::query(root, ".cursor-trail"),
            dot: dom::query(root, ".cursor-dot"),
        }
    }

    fn layers(&self) -> impl Iterator<Item = &HtmlElement> {
        [&self.ring, &self.trail, &self.dot].into_iter().flatten()
    }

    fn apply_flags(&self, flags: CursorFlags) {
        for el in self.layers() {
            let classes = el.class_list();
            let _ = classes.toggle_with_force("is-hovering", flags.hovering);
            let _ = classes.toggle_with_force("is-pressed", flags.pressed);
            let _ = classes.toggle_with_force("is-hidden", !flags.visible);
        }
    }

    fn place(el: &Option<HtmlElement>, pos: Vec2) {
        if let Some(el) = el {
            let transform = format!("translate3d({:.2}px, {:.2}px, 0) translate(-50%, -50%)", pos.x, pos.y);
            let _ = el.style().set_property("transform", &transform);
        }
    }
}

struct Inner {
    stage: Stage,
    window: Window,
    sections: Vec<HtmlElement>,
    cursor: Rc<CursorDom>,
    listeners: Vec<Listener>,
    raf: Option<i32>,
    has_renderer: bool,
}

impl Inner {
    /// Re-reads viewport, document height and section bounds.
    fn layout(&mut self) {
        let (w, h) = dom::viewport(&self.window);
        let doc_height = self.window.document().map(|d| dom::document_height(&d)).unwrap_or(h);
        self.stage.resize(Vec2::new(w, h), doc_height);
        let scroll_y = self.window.scroll_y().unwrap_or(0.0) as f32;
        for (i, root) in self.sections.iter().enumerate() {
            self.stage.layout_section(i, dom::layout_bounds(root, scroll_y));
        }
        log::debug!("layout: {w}x{h}, document {doc_height}px, {} sections", self.sections.len());
    }
}

type FrameClosure = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// A mounted page. `destroy` (or dropping the handle) removes every listener,
/// frame callback and GL resource created by `mount`.
#[wasm_bindgen]
pub struct Portfolio {
    inner: Rc<RefCell<Inner>>,
    frame: FrameClosure,
}

#[wasm_bindgen]
impl Portfolio {
    pub fn destroy(&mut self) {
        // Dropping the closure breaks its self-reference.
        self.frame.borrow_mut().take();
        let Ok(mut inner) = self.inner.try_borrow_mut() else {
            log::warn!("destroy during a frame; skipped");
            return;
        };
        if let Some(id) = inner.raf.take() {
            let _ = inner.window.cancel_animation_frame(id);
        }
        inner.listeners.clear();
        inner.stage.unmount();
    }

    /// Page scroll progress in [0, 1].
    pub fn progress(&self) -> f32 {
        self.inner.borrow().stage.state().progress.get()
    }

    #[wasm_bindgen(js_name = "particleMode")]
    pub fn particle_mode(&self) -> f32 {
        self.inner.borrow().stage.state().particles.current()
    }

    #[wasm_bindgen(js_name = "scrollTo")]
    pub fn scroll_to(&self, offset: f32) {
        self.inner.borrow_mut().stage.state_mut().scroll.scroll_to(offset);
    }

    /// Re-measures sections after content changed size.
    pub fn refresh(&self) {
        self.inner.borrow_mut().layout();
    }

    /// Runs one frame at `now` ms outside the animation loop.
    #[wasm_bindgen(js_name = "tick")]
    pub fn step(&self, now: f64) {
        if let Ok(mut inner) = self.inner.try_borrow_mut() {
            inner.stage.tick(now);
        }
    }

    /// False when WebGL2 was unavailable and the mesh is not drawn.
    #[wasm_bindgen(js_name = "hasRenderer")]
    pub fn has_renderer(&self) -> bool {
        self.inner.borrow().has_renderer
    }
}

impl Drop for Portfolio {
    fn drop(&mut self) {
        self.destroy();
    }
}

/// Mounts the stage on the canvas with id `canvas_id` (default `c`).
#[wasm_bindgen]
pub fn mount(canvas_id: Option<String>) -> std::result::Result<Portfolio, JsValue> {
    Ok(try_mount(canvas_id.as_deref().unwrap_or(DEFAULT_CANVAS_ID))?)
}

fn try_mount(canvas_id: &str) -> Result<Portfolio> {
    config::validate_presets()?;
    let window = dom::window()?;
    let document = dom::document()?;
    let body: Element = document.body().ok_or_else(|| Error::MissingElement("body".into()))?.into();
    let canvas = document
        .get_element_by_id(canvas_id)
        .ok_or_else(|| Error::MissingElement(format!("#{canvas_id}")))?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| Error::MissingElement(format!("canvas#{canvas_id}")))?;

    let (w, h) = dom::viewport(&window);
    let mut stage = Stage::new(Vec2::new(w, h));

    let mut section_doms = Vec::new();
    let mut roots = Vec::new();
    for root in dom::query_all(&body, "[data-section]") {
        let sd = SectionDom::build(&document, root.clone());
        stage.add_section(Section::new(sd.name(), sd.counts(), sd.feature));
        section_doms.push(sd);
        roots.push(root);
    }
    log::info!("mounting {} sections", roots.len());

    // Subscribers below run after the core pass, in this order.
    {
        let window = window.clone();
        let mut last = f32::NAN;
        stage.attach(move |s, _| {
            let y = s.scroll.offset();
            if y != last {
                window.scroll_to_with_x_and_y(0.0, y as f64);
                last = y;
            }
        });
    }
    stage.attach(move |s, _| {
        for (i, sd) in section_doms.iter_mut().enumerate() {
            if let Some(section) = s.sections.get(i) {
                sd.write_entry(section.entry_styles());
                sd.write_exit(section.exit_style());
            }
        }
    });
    let cursor = Rc::new(CursorDom::find(&body));
    {
        let cursor = cursor.clone();
        stage.attach(move |s, _| {
            if let Some(frame) = s.cursor_frame {
                CursorDom::place(&cursor.dot, frame.dot);
                CursorDom::place(&cursor.ring, frame.ring);
                CursorDom::place(&cursor.trail, frame.trail);
            }
        });
    }
    // A page without WebGL2 keeps every DOM writer; only the mesh is missing.
    let has_renderer = match Renderer::new(canvas) {
        Ok(mut renderer) => {
            let window = window.clone();
            stage.attach(move |s, _| {
                renderer.fit(s.viewport.x, s.viewport.y, window.device_pixel_ratio());
                renderer.draw(s);
            });
            true
        }
        Err(err) => {
            log::warn!("renderer unavailable, continuing without the mesh: {err}");
            false
        }
    };

    let inner = Rc::new(RefCell::new(Inner {
        stage,
        window: window.clone(),
        sections: roots,
        cursor,
        listeners: Vec::new(),
        raf: None,
        has_renderer,
    }));
    {
        let mut inner = inner.borrow_mut();
        inner.layout();
        // Adopt the scroll position the page loaded with.
        let y = window.scroll_y().unwrap_or(0.0) as f32;
        inner.stage.on_native_scroll(y);
    }
    let listeners = listen(&window, &document, Rc::downgrade(&inner))?;
    inner.borrow_mut().listeners = listeners;
    {
        let inner = inner.borrow();
        let flags = inner.stage.state().cursor.flags();
        inner.cursor.apply_flags(flags);
    }

    let frame = start_loop(&window, &inner)?;
    Ok(Portfolio { inner, frame })
}

/// Runs `f` against the live state unless it is gone or mid-frame.
fn with_inner(weak: &Weak<RefCell<Inner>>, f: impl FnOnce(&mut Inner)) {
    if let Some(inner) = weak.upgrade() {
        if let Ok(mut inner) = inner.try_borrow_mut() {
            f(&mut inner);
        }
    }
}

fn listen(window: &Window, document: &web_sys::Document, weak: Weak<RefCell<Inner>>) -> Result<Vec<Listener>> {
    let mut out = Vec::new();

    let w = weak.clone();
    let win = window.clone();
    out.push(Listener::new(window, "wheel", false, move |e: WheelEvent| {
        if e.ctrl_key() {
            return;
        }
        e.prevent_default();
        let scale = match e.delta_mode() {
            WheelEvent::DOM_DELTA_LINE => LINE_HEIGHT_PX,
            WheelEvent::DOM_DELTA_PAGE => win.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(800.0),
            _ => 1.0,
        };
        with_inner(&w, |inner| inner.stage.on_wheel((e.delta_y() * scale) as f32));
    })?);

    let w = weak.clone();
    let win = window.clone();
    out.push(Listener::new(window, "scroll", true, move |_: web_sys::Event| {
        let y = win.scroll_y().unwrap_or(0.0) as f32;
        with_inner(&w, |inner| inner.stage.on_native_scroll(y));
    })?);

    let w = weak.clone();
    out.push(Listener::new(window, "pointermove", true, move |e: PointerEvent| {
        let pos = Vec2::new(e.client_x() as f32, e.client_y() as f32);
        with_inner(&w, |inner| {
            let was_visible = inner.stage.state().cursor.flags().visible;
            inner.stage.on_pointer_move(pos);
            let flags = inner.stage.state().cursor.flags();
            if !was_visible {
                inner.cursor.apply_flags(flags);
            }
        });
    })?);

    for (kind, pressed) in [("pointerdown", true), ("pointerup", false)] {
        let w = weak.clone();
        out.push(Listener::new(window, kind, true, move |_: PointerEvent| {
            with_inner(&w, |inner| {
                inner.stage.state_mut().cursor.set_pressed(pressed);
                let flags = inner.stage.state().cursor.flags();
                inner.cursor.apply_flags(flags);
            });
        })?);
    }

    let w = weak.clone();
    out.push(Listener::new(document, "pointerover", true, move |e: PointerEvent| {
        let hovering = e
            .target()
            .and_then(|t| t.dyn_into::<Element>().ok())
            .and_then(|el| el.closest(config::INTERACTIVE_SELECTOR).ok().flatten())
            .is_some();
        with_inner(&w, |inner| {
            if inner.stage.state_mut().cursor.set_hovering(hovering) {
                let flags = inner.stage.state().cursor.flags();
                inner.cursor.apply_flags(flags);
            }
        });
    })?);

    let w = weak.clone();
    let root: web_sys::EventTarget = match document.document_element() {
        Some(el) => el.into(),
        None => document.clone().into(),
    };
    out.push(Listener::new(&root, "mouseleave", true, move |_: MouseEvent| {
        with_inner(&w, |inner| {
            inner.stage.on_pointer_leave();
            let flags = inner.stage.state().cursor.flags();
            inner.cursor.apply_flags(flags);
        });
    })?);

    let w = weak;
    out.push(Listener::new(window, "resize", true, move |_: web_sys::Event| {
        with_inner(&w, Inner::layout);
    })?);

    Ok(out)
}

/// Animation loop
fn start_loop(window: &Window, inner: &Rc<RefCell<Inner>>) -> Result<FrameClosure> {
    // `f` holds the animation-frame closure so that we can keep calling
    // `request_animation_frame` recursively. Storing it inside an `Option`
    // allows us to create the `Closure` first and then obtain a reference to
    // it from within itself.
    let f: FrameClosure = Rc::new(RefCell::new(None));
    let g = f.clone();
    let weak = Rc::downgrade(inner);
    let win = window.clone();
    *g.borrow_mut() = Some(Closure::new(move |now: f64| {
        let Some(inner) = weak.upgrade() else {
            return;
        };
        let Ok(mut inner) = inner.try_borrow_mut() else {
            return;
        };
        if inner.stage.tick(now).is_none() {
            return;
        }
        // schedule next
        if let Some(cb) = f.borrow().as_ref() {
            inner.raf = win.request_animation_frame(cb.as_ref().unchecked_ref()).ok();
        }
    }));

    let id = match g.borrow().as_ref() {
        Some(cb) => window.request_animation_frame(cb.as_ref().unchecked_ref())?,
        None => return Err(Error::Js("frame closure missing".into())),
    };
    inner.borrow_mut().raf = Some(id);
    Ok(g)
}
