use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use plume_client::appearance::{
    AppearanceListener, AppearanceSubscription, ListenerRegistry,
    ManualAppearanceSource, OsAppearanceSource,
};
use plume_client::theme::{ThemeController, resolve};
use plume_model::{AppearanceMode, ColorScheme};

fn source(os: Option<ColorScheme>) -> Arc<ManualAppearanceSource> {
    Arc::new(ManualAppearanceSource::new(os))
}

#[test]
fn resolve_is_total() {
    for mode in AppearanceMode::ALL {
        for os in [None, Some(ColorScheme::Light), Some(ColorScheme::Dark)] {
            let effective = resolve(mode, os);
            match mode {
                AppearanceMode::Light => assert_eq!(effective, ColorScheme::Light),
                AppearanceMode::Dark => assert_eq!(effective, ColorScheme::Dark),
                AppearanceMode::Auto => {
                    assert_eq!(effective, os.unwrap_or(ColorScheme::Light))
                }
            }
        }
    }
}

#[test]
fn toggling_auto_light_auto_subscribes_twice_and_unsubscribes_once() {
    let os = source(Some(ColorScheme::Dark));
    let controller = ThemeController::new(os.clone(), AppearanceMode::Auto);

    controller.set_appearance_mode(AppearanceMode::Light);
    assert_eq!(controller.effective(), ColorScheme::Light);
    assert_eq!(os.active_listeners(), 0);

    controller.set_appearance_mode(AppearanceMode::Auto);
    assert_eq!(controller.effective(), ColorScheme::Dark);

    assert_eq!(os.subscribe_count(), 2);
    assert_eq!(os.unsubscribe_count(), 1);
    assert_eq!(os.active_listeners(), 1);
}

#[test]
fn subscription_counts_never_drift_apart() {
    let os = source(None);
    let controller = ThemeController::new(os.clone(), AppearanceMode::Light);
    let modes = [
        AppearanceMode::Auto,
        AppearanceMode::Auto,
        AppearanceMode::Dark,
        AppearanceMode::Light,
        AppearanceMode::Auto,
        AppearanceMode::Dark,
        AppearanceMode::Auto,
    ];

    for mode in modes {
        controller.set_appearance_mode(mode);
        let diff = os.subscribe_count() - os.unsubscribe_count();
        assert!(diff <= 1);
        assert_eq!(os.active_listeners(), diff);
        assert_eq!(diff == 1, controller.is_following_os());
    }
}

#[test]
fn dropping_the_controller_releases_the_subscription() {
    let os = source(Some(ColorScheme::Light));
    {
        let _controller = ThemeController::new(os.clone(), AppearanceMode::Auto);
        assert_eq!(os.active_listeners(), 1);
    }
    assert_eq!(os.active_listeners(), 0);
    assert_eq!(os.unsubscribe_count(), 1);
}

#[test]
fn os_changes_are_ignored_outside_auto() {
    let os = source(Some(ColorScheme::Light));
    let controller = ThemeController::new(os.clone(), AppearanceMode::Auto);

    os.set_scheme(Some(ColorScheme::Dark));
    assert_eq!(controller.effective(), ColorScheme::Dark);

    controller.set_appearance_mode(AppearanceMode::Light);
    os.set_scheme(Some(ColorScheme::Light));
    os.set_scheme(Some(ColorScheme::Dark));
    assert_eq!(controller.effective(), ColorScheme::Light);
}

#[test]
fn entering_auto_picks_up_the_current_os_scheme() {
    let os = source(Some(ColorScheme::Light));
    let controller = ThemeController::new(os.clone(), AppearanceMode::Dark);

    os.set_scheme(Some(ColorScheme::Dark));
    controller.set_appearance_mode(AppearanceMode::Auto);

    let state = controller.current();
    assert_eq!(state.mode, AppearanceMode::Auto);
    assert_eq!(state.os_scheme, Some(ColorScheme::Dark));
    assert_eq!(state.effective, ColorScheme::Dark);
}

/// OS source whose scheme flips right after a read returns, notifying
/// listeners before the reader can act on the stale value.
#[derive(Debug)]
struct FlipAfterReadSource {
    scheme: Mutex<ColorScheme>,
    flip_to: ColorScheme,
    armed: AtomicBool,
    registry: ListenerRegistry,
}

impl FlipAfterReadSource {
    fn new(initial: ColorScheme, flip_to: ColorScheme) -> Self {
        Self {
            scheme: Mutex::new(initial),
            flip_to,
            armed: AtomicBool::new(false),
            registry: ListenerRegistry::new(),
        }
    }

    fn arm(&self) {
        self.armed.store(true, Ordering::SeqCst);
    }
}

impl OsAppearanceSource for FlipAfterReadSource {
    fn current(&self) -> Option<ColorScheme> {
        let read = *self.scheme.lock();
        if self.armed.swap(false, Ordering::SeqCst) {
            *self.scheme.lock() = self.flip_to;
            self.registry.notify(self.flip_to);
        }
        Some(read)
    }

    fn add_change_listener(
        &self,
        listener: AppearanceListener,
    ) -> AppearanceSubscription {
        self.registry.register(listener)
    }
}

#[test]
fn os_change_during_switch_to_auto_is_not_lost() {
    let os = Arc::new(FlipAfterReadSource::new(
        ColorScheme::Light,
        ColorScheme::Dark,
    ));
    let controller = ThemeController::new(os.clone(), AppearanceMode::Light);

    os.arm();
    controller.set_appearance_mode(AppearanceMode::Auto);

    let state = controller.current();
    assert_eq!(state.mode, AppearanceMode::Auto);
    assert_eq!(state.os_scheme, Some(ColorScheme::Dark));
    assert_eq!(state.effective, ColorScheme::Dark);
}

#[test]
fn os_change_during_construction_is_not_lost() {
    let os = Arc::new(FlipAfterReadSource::new(
        ColorScheme::Light,
        ColorScheme::Dark,
    ));
    os.arm();

    let controller = ThemeController::new(os.clone(), AppearanceMode::Auto);

    assert_eq!(controller.effective(), ColorScheme::Dark);
    assert_eq!(os.registry.active_listeners(), 1);
}
