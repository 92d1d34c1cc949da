use crate::config::{Config, RulerConfig, SweepConfig};
use crate::events::AppEvent;
use crate::gui::theme::{self, ThemeColors};
use crate::gui::view;
use crate::ruler::{Ruler, RulerAction};
use gtk::prelude::*;
use gtk4 as gtk;
use relm4::prelude::*;
use std::cell::{Cell, RefCell};
use std::ops::RangeInclusive;
use std::rc::Rc;
use std::time::Duration;

pub struct AppModel {
    pub ruler: Rc<RefCell<Ruler>>,
    pub sweep: SweepConfig,
    pub drawing_area: gtk::DrawingArea,
    /// A frame-clock tick callback is installed and still animating.
    ticking: Rc<Cell<bool>>,
    /// Bumped to stop the running sweep timer.
    sweep_generation: Rc<Cell<u64>>,
}

#[derive(Debug)]
pub enum AppMsg {
    SetValue(i32),
    StartSweep,
    StopSweep,
    ConfigReload(Box<Config>),
    Resize(i32, i32),
    PointerDown(f64),
    PointerMove(f64),
    PointerUp(f64),
    PointerCancel,
    Fling(f64),
}

impl From<AppEvent> for AppMsg {
    fn from(event: AppEvent) -> Self {
        match event {
            AppEvent::SetValue(v) => AppMsg::SetValue(v),
            AppEvent::StartSweep => AppMsg::StartSweep,
            AppEvent::StopSweep => AppMsg::StopSweep,
            AppEvent::ConfigReload(config) => AppMsg::ConfigReload(config),
        }
    }
}

#[relm4::component(pub)]
impl SimpleComponent for AppModel {
    type Init = (
        Ruler,
        SweepConfig,
        bool,
        async_channel::Receiver<AppEvent>,
    );
    type Input = AppMsg;
    type Output = ();

    view! {
        #[root]
        #[name = "window"]
        gtk::ApplicationWindow {
            set_title: Some("Scale Ruler"),
            set_default_size: (480, 140),
            add_css_class: "ruler-window",

            add_controller = gtk::EventControllerKey {
                connect_key_pressed[sender] => move |_, key, _, _| {
                    match key {
                        gtk::gdk::Key::space => sender.input(AppMsg::StartSweep),
                        gtk::gdk::Key::Escape => sender.input(AppMsg::StopSweep),
                        _ => return glib::Propagation::Proceed,
                    }
                    glib::Propagation::Stop
                }
            },

            #[name = "drawing_area"]
            gtk::DrawingArea {
                set_hexpand: true,
                set_vexpand: true,
                add_css_class: "ruler-drawing-area",

                connect_resize[sender] => move |_, width, height| {
                    sender.input(AppMsg::Resize(width, height));
                },

                add_controller = gtk::GestureDrag {
                    connect_drag_begin[sender] => move |_, x, _| {
                        sender.input(AppMsg::PointerDown(x));
                    },
                    connect_drag_update[sender] => move |gesture, dx, _| {
                        if let Some((x, _)) = gesture.start_point() {
                            sender.input(AppMsg::PointerMove(x + dx));
                        }
                    },
                    connect_drag_end[sender] => move |gesture, dx, _| {
                        if let Some((x, _)) = gesture.start_point() {
                            sender.input(AppMsg::PointerUp(x + dx));
                        }
                    },
                    connect_cancel[sender] => move |_, _| {
                        sender.input(AppMsg::PointerCancel);
                    }
                },

                add_controller = gtk::GestureSwipe {
                    connect_swipe[sender] => move |_, velocity_x, _| {
                        sender.input(AppMsg::Fling(velocity_x));
                    }
                }
            }
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let (ruler, sweep, start_sweep, rx) = init;

        theme::load_css();

        let mut model = AppModel {
            ruler: Rc::new(RefCell::new(ruler)),
            sweep,
            drawing_area: gtk::DrawingArea::default(),
            ticking: Rc::new(Cell::new(false)),
            sweep_generation: Rc::new(Cell::new(0)),
        };

        let widgets = view_output!();
        model.drawing_area = widgets.drawing_area.clone();

        let ruler_draw = model.ruler.clone();
        widgets
            .drawing_area
            .set_draw_func(move |drawing_area, cr, _, _| {
                let style_context = drawing_area.style_context();
                let colors = ThemeColors::from_context(&style_context);
                if let Err(e) = view::draw(cr, &ruler_draw.borrow(), &colors) {
                    log::error!("Drawing error: {}", e);
                }
            });

        let sender_clone = sender.clone();
        relm4::spawn(async move {
            while let Ok(event) = rx.recv().await {
                sender_clone.input(AppMsg::from(event));
            }
        });

        if start_sweep {
            sender.input(AppMsg::StartSweep);
        }

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, sender: ComponentSender<Self>) {
        let action = match msg {
            AppMsg::SetValue(value) => self.ruler.borrow_mut().set_selected_value(value),
            AppMsg::StartSweep => {
                self.start_sweep(sender);
                return;
            }
            AppMsg::StopSweep => {
                self.stop_sweep();
                return;
            }
            AppMsg::ConfigReload(config) => {
                let Config { ruler, sweep } = *config;
                self.sweep = sweep;
                match self.ruler.borrow_mut().reconfigure(ruler) {
                    Ok(action) => {
                        log::info!("Configuration reloaded");
                        action
                    }
                    Err(e) => {
                        log::error!("Rejected reloaded config: {}", e);
                        return;
                    }
                }
            }
            AppMsg::Resize(width, height) => self.ruler.borrow_mut().on_size_changed(width, height),
            AppMsg::PointerDown(x) => {
                self.stop_sweep();
                self.ruler.borrow_mut().on_pointer_down(x)
            }
            AppMsg::PointerMove(x) => self.ruler.borrow_mut().on_pointer_move(x),
            AppMsg::PointerUp(x) => self.ruler.borrow_mut().on_pointer_up(x),
            AppMsg::PointerCancel => self.ruler.borrow_mut().on_pointer_cancel(),
            AppMsg::Fling(velocity) => self.ruler.borrow_mut().on_fling(velocity),
        };
        self.handle(action);
    }
}

impl AppModel {
    fn handle(&self, action: RulerAction) {
        if action.should_redraw {
            self.drawing_area.queue_draw();
        }
        if action.wants_frame && !self.ticking.replace(true) {
            let ruler = self.ruler.clone();
            let ticking = self.ticking.clone();
            self.drawing_area.add_tick_callback(move |area, clock| {
                let frame_time = Duration::from_micros(clock.frame_time().max(0) as u64);
                let action = ruler.borrow_mut().on_frame(frame_time);
                if action.should_redraw {
                    area.queue_draw();
                }
                if action.wants_frame {
                    glib::ControlFlow::Continue
                } else {
                    ticking.set(false);
                    glib::ControlFlow::Break
                }
            });
        }
    }

    /// Walks the selection from the minimum to the maximum value, one step per interval.
    fn start_sweep(&self, sender: ComponentSender<Self>) {
        self.stop_sweep();
        let generation = self.sweep_generation.get();
        let current = self.sweep_generation.clone();
        let mut values = sweep_values(self.ruler.borrow().config());
        log::info!(
            "Sweeping {:?} every {}ms",
            values,
            self.sweep.interval_ms
        );

        glib::timeout_add_local(
            Duration::from_millis(self.sweep.interval_ms.max(1)),
            move || {
                if current.get() != generation {
                    return glib::ControlFlow::Break;
                }
                match values.next() {
                    Some(value) => {
                        sender.input(AppMsg::SetValue(value));
                        glib::ControlFlow::Continue
                    }
                    None => glib::ControlFlow::Break,
                }
            },
        );
    }

    fn stop_sweep(&self) {
        self.sweep_generation.set(self.sweep_generation.get() + 1);
    }
}

/// Every value of the configured range, in the order the demo sweep selects them.
fn sweep_values(config: &RulerConfig) -> RangeInclusive<i32> {
    config.min_value..=config.max_value
}
