//! Browser runtime: resolves the canvas, loads the atlas, then owns the
//! engine together with its animation-frame loop and input listeners.
//!
//! The page gets a `GameHandle` back from `start_game`. Closures registered
//! with the browser only hold weak references to the runtime, so dropping
//! the handle (or calling `destroy`) is what tears everything down.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    AddEventListenerOptions, CanvasRenderingContext2d, Event, EventTarget, HtmlCanvasElement, KeyboardEvent,
    TouchEvent, Window, window,
};

use crate::audio::{AudioPlayer, HtmlAudioSink};
use crate::clock::{FrameClock, FrameId, FrameLoop, FrameScheduler};
use crate::config::GameConfig;
use crate::engine::Engine;
use crate::error::GameError;
use crate::input::{InputAdapter, InputEvent, Key};
use crate::sprites::{LoadedAtlas, load_atlas};
use crate::surface::CanvasSurface;
use crate::util::Rng;

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

struct RafScheduler {
    callback: FrameCallback,
}

impl FrameScheduler for RafScheduler {
    fn request_frame(&mut self) -> Option<FrameId> {
        let win = window()?;
        let callback = self.callback.borrow();
        let f = callback.as_ref()?;
        win.request_animation_frame(f.as_ref().unchecked_ref()).ok()
    }

    fn cancel_frame(&mut self, id: FrameId) {
        if let Some(win) = window() {
            let _ = win.cancel_animation_frame(id);
        }
    }
}

struct Listener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn attach<F>(target: &EventTarget, kind: &'static str, f: F) -> Result<Self, GameError>
    where
        F: FnMut(Event) + 'static,
    {
        let callback = Closure::wrap(Box::new(f) as Box<dyn FnMut(Event)>);
        // Non-passive so touch handlers may cancel scrolling.
        let options = AddEventListenerOptions::new();
        options.set_passive(false);
        target.add_event_listener_with_callback_and_add_event_listener_options(
            kind,
            callback.as_ref().unchecked_ref(),
            &options,
        )?;
        Ok(Self { target: target.clone(), kind, callback })
    }

    fn detach(self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.callback.as_ref().unchecked_ref());
    }
}

#[derive(Clone, Copy)]
enum Prevent {
    WhenConsumed,
    Always,
}

struct Runtime {
    engine: RefCell<Engine>,
    surface: RefCell<CanvasSurface>,
    input: RefCell<InputAdapter>,
    clock: RefCell<FrameClock>,
    frame_loop: RefCell<FrameLoop<RafScheduler>>,
    frame_callback: FrameCallback,
    listeners: RefCell<Vec<Listener>>,
}

impl Runtime {
    fn on_frame(&self, timestamp: f64) {
        if !self.frame_loop.borrow_mut().frame_fired() {
            return;
        }
        let delta = self.clock.borrow_mut().delta(timestamp);
        let mut surface = self.surface.borrow_mut();
        self.engine.borrow_mut().tick(delta, &mut *surface);
    }

    /// Returns true when the event mapped to a command.
    fn on_input(&self, event: InputEvent) -> bool {
        let command = self.input.borrow_mut().handle(event);
        match command {
            Some(command) => {
                self.engine.borrow_mut().apply(command);
                true
            }
            None => false,
        }
    }

    fn teardown(&self) {
        self.frame_loop.borrow_mut().stop();
        self.frame_callback.borrow_mut().take();
        for listener in self.listeners.borrow_mut().drain(..) {
            listener.detach();
        }
    }
}

impl Drop for Runtime {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn listen<F>(
    runtime: &Rc<Runtime>,
    target: &EventTarget,
    kind: &'static str,
    prevent: Prevent,
    map: F,
) -> Result<(), GameError>
where
    F: Fn(&Event) -> Option<InputEvent> + 'static,
{
    let weak: Weak<Runtime> = Rc::downgrade(runtime);
    let listener = Listener::attach(target, kind, move |evt: Event| {
        let Some(rt) = weak.upgrade() else { return };
        let consumed = map(&evt).is_some_and(|input| rt.on_input(input));
        if consumed || matches!(prevent, Prevent::Always) {
            evt.prevent_default();
        }
    })?;
    runtime.listeners.borrow_mut().push(listener);
    Ok(())
}

fn key_event(evt: &Event) -> Option<Key> {
    evt.dyn_ref::<KeyboardEvent>().and_then(|k| Key::from_code(&k.code()))
}

fn touch_point(evt: &Event, changed: bool) -> Option<(f64, f64)> {
    let touch_evt = evt.dyn_ref::<TouchEvent>()?;
    let list = if changed { touch_evt.changed_touches() } else { touch_evt.touches() };
    let touch = list.get(0)?;
    Some((touch.client_x() as f64, touch.client_y() as f64))
}

fn attach_listeners(
    runtime: &Rc<Runtime>,
    win: &Window,
    doc: &EventTarget,
    canvas: &EventTarget,
) -> Result<(), GameError> {
    listen(runtime, doc, "keydown", Prevent::WhenConsumed, |e| key_event(e).map(InputEvent::KeyDown))?;
    listen(runtime, doc, "keyup", Prevent::WhenConsumed, |e| key_event(e).map(InputEvent::KeyUp))?;

    let touch_enabled = js_sys::Reflect::has(win, &JsValue::from_str("ontouchstart")).unwrap_or(false);
    if touch_enabled {
        listen(runtime, canvas, "touchstart", Prevent::Always, |e| {
            touch_point(e, false).map(|(x, y)| InputEvent::TouchStart { x, y })
        })?;
        listen(runtime, canvas, "touchmove", Prevent::Always, |_| Some(InputEvent::TouchMove))?;
        listen(runtime, canvas, "touchend", Prevent::Always, |e| {
            touch_point(e, true).map(|(x, y)| InputEvent::TouchEnd { x, y })
        })?;
    }

    listen(runtime, canvas, "mousedown", Prevent::WhenConsumed, |_| Some(InputEvent::PointerDown))?;
    listen(runtime, canvas, "mouseup", Prevent::WhenConsumed, |_| Some(InputEvent::PointerUp))?;
    Ok(())
}

fn is_mobile(win: &Window) -> bool {
    win.navigator()
        .user_agent()
        .map(|ua| ua.contains("Mobi") || ua.contains("UIWebViewForStaticFileContent"))
        .unwrap_or(false)
}

#[cfg(feature = "serde_json")]
fn load_config(json: Option<String>) -> Result<GameConfig, GameError> {
    match json {
        Some(text) => Ok(GameConfig::from_json(&text)?),
        None => Ok(GameConfig::default()),
    }
}

#[cfg(not(feature = "serde_json"))]
fn load_config(json: Option<String>) -> Result<GameConfig, GameError> {
    if json.is_some() {
        log::warn!("config JSON ignored: built without serde_json");
    }
    Ok(GameConfig::default())
}

fn launch(
    config: GameConfig,
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    atlas: LoadedAtlas,
) -> Result<GameHandle, GameError> {
    let win = window().ok_or(GameError::NoWindow)?;
    let doc = win.document().ok_or(GameError::NoDocument)?;

    let surface = CanvasSurface::new(canvas.clone(), ctx, atlas.image, config.width, config.height);
    let audio = AudioPlayer::new(Box::new(HtmlAudioSink::preload(config.audio_sources())), config.audio_volume);
    let input = InputAdapter::new(config.min_swipe_distance, !is_mobile(&win));
    let clock = FrameClock::new(config.max_frame_delta_ms);
    let frame_callback: FrameCallback = Rc::new(RefCell::new(None));
    let engine = Engine::new(config, atlas.sheet, audio, Rng::from_entropy());

    let runtime = Rc::new(Runtime {
        engine: RefCell::new(engine),
        surface: RefCell::new(surface),
        input: RefCell::new(input),
        clock: RefCell::new(clock),
        frame_loop: RefCell::new(FrameLoop::new(RafScheduler { callback: frame_callback.clone() })),
        frame_callback,
        listeners: RefCell::new(Vec::new()),
    });

    {
        let weak = Rc::downgrade(&runtime);
        *runtime.frame_callback.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
            if let Some(rt) = weak.upgrade() {
                rt.on_frame(ts);
            }
        }) as Box<dyn FnMut(f64)>));
    }
    {
        let weak = Rc::downgrade(&runtime);
        runtime.engine.borrow_mut().on_destroy(move || {
            if let Some(rt) = weak.upgrade() {
                rt.teardown();
            }
        });
    }

    attach_listeners(&runtime, &win, &doc, &canvas)?;
    runtime.frame_loop.borrow_mut().start();
    log::info!("runner started on #{}", canvas.id());
    Ok(GameHandle { runtime })
}

fn begin(
    canvas_id: &str,
    atlas_src: &str,
    config_json: Option<String>,
    resolve: js_sys::Function,
    reject: js_sys::Function,
) -> Result<(), GameError> {
    let config = load_config(config_json)?;
    let win = window().ok_or(GameError::NoWindow)?;
    let doc = win.document().ok_or(GameError::NoDocument)?;
    let canvas: HtmlCanvasElement = doc
        .get_element_by_id(canvas_id)
        .and_then(|el| el.dyn_into().ok())
        .ok_or_else(|| GameError::CanvasNotFound(canvas_id.to_string()))?;
    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .and_then(|c| c.dyn_into().ok())
        .ok_or(GameError::NoContext)?;

    load_atlas(atlas_src, move |loaded| {
        match loaded.and_then(|atlas| launch(config, canvas, ctx, atlas)) {
            Ok(handle) => {
                let _ = resolve.call1(&JsValue::NULL, &JsValue::from(handle));
            }
            Err(err) => {
                log::error!("runner failed to start: {err}");
                let _ = reject.call1(&JsValue::NULL, &JsValue::from(err));
            }
        }
    })
}

/// Loads the atlas and starts the runner on the canvas with id `canvas_id`.
/// Resolves with a `GameHandle`; rejects if the canvas, config or atlas is
/// unusable, in which case no frame loop is started.
#[wasm_bindgen]
pub fn start_game(canvas_id: &str, atlas_src: &str, config_json: Option<String>) -> js_sys::Promise {
    let canvas_id = canvas_id.to_string();
    let atlas_src = atlas_src.to_string();
    let mut config_json = config_json;
    js_sys::Promise::new(&mut |resolve, reject: js_sys::Function| {
        if let Err(err) = begin(&canvas_id, &atlas_src, config_json.take(), resolve, reject.clone()) {
            log::error!("runner failed to start: {err}");
            let _ = reject.call1(&JsValue::NULL, &JsValue::from(err));
        }
    })
}

/// Page-side handle to one running game. Each handle is independent.
#[wasm_bindgen]
pub struct GameHandle {
    runtime: Rc<Runtime>,
}

#[wasm_bindgen]
impl GameHandle {
    pub fn start(&self) {
        self.runtime.engine.borrow_mut().start();
    }

    pub fn jump(&self) {
        self.runtime.engine.borrow_mut().jump();
    }

    pub fn duck(&self) {
        self.runtime.engine.borrow_mut().duck();
    }

    pub fn stand(&self) {
        self.runtime.engine.borrow_mut().stand();
    }

    pub fn pause(&self) {
        self.runtime.engine.borrow_mut().pause();
    }

    pub fn restart(&self) {
        self.runtime.engine.borrow_mut().restart();
    }

    /// Stops the frame loop and detaches input. Repeated calls do nothing.
    pub fn destroy(&self) {
        self.runtime.engine.borrow_mut().destroy();
    }

    #[wasm_bindgen(js_name = setVolume)]
    pub fn set_volume(&self, volume: f64) {
        self.runtime.engine.borrow_mut().audio_mut().set_volume(volume);
    }

    pub fn mute(&self) {
        self.runtime.engine.borrow_mut().audio_mut().mute();
    }

    pub fn unmute(&self) {
        self.runtime.engine.borrow_mut().audio_mut().unmute();
    }

    #[wasm_bindgen(js_name = enableAudio)]
    pub fn enable_audio(&self) {
        self.runtime.engine.borrow_mut().audio_mut().enable();
    }

    #[wasm_bindgen(js_name = disableAudio)]
    pub fn disable_audio(&self) {
        self.runtime.engine.borrow_mut().audio_mut().disable();
    }

    pub fn state(&self) -> String {
        self.runtime.engine.borrow().state().as_str().to_string()
    }

    pub fn score(&self) -> f64 {
        self.runtime.engine.borrow().score() as f64
    }

    #[wasm_bindgen(js_name = highScore)]
    pub fn high_score(&self) -> f64 {
        self.runtime.engine.borrow().high_score() as f64
    }
}
