//! The OS facade and the per-thread current-instance slot.

use std::cell::{Cell, RefCell};
use std::path::Path;
use std::rc::Rc;

use crate::config::SystemConfig;
use crate::error::{SystemError, SystemResult};
use crate::event::EventQueue;
use crate::font::{Font, SpriteSheetFont};
use crate::keys::{resolve_modifiers, KeyModifiers, KeyScancode};
use crate::platform::ActivePlatform;
use crate::registry::ServiceRegistry;
use crate::traits::{Logger, Menus, NativeDialogs, Platform};

/// Everything the host application asks of the operating system.
///
/// Accessors for optional services return `None` when the platform has no
/// such concept; callers are expected to check.
pub trait System {
    fn platform_name(&self) -> &'static str;

    /// Brings the application to the foreground where the platform has an
    /// application object.
    fn activate_app(&self);

    /// Starts delivering application-level events (e.g. files opened from
    /// the OS) where the platform has such a step.
    fn finish_launching(&self);

    fn use_wintab_api(&self, state: bool);
    fn wintab_api_enabled(&self) -> bool;

    fn logger(&self) -> Option<&dyn Logger>;
    fn native_dialogs(&self) -> Option<Rc<dyn NativeDialogs>>;
    fn menus(&self) -> Option<Rc<dyn Menus>>;
    fn event_queue(&self) -> Rc<EventQueue>;

    fn load_sprite_sheet_font(&self, path: &Path, scale: u32) -> SystemResult<Font>;
    fn load_true_type_font(&self, path: &Path, pixel_height: f32) -> SystemResult<Font>;

    fn key_modifiers(&self) -> KeyModifiers;
    fn is_key_pressed(&self, key: KeyScancode) -> bool;

    /// Detaches this system from the current-instance slot and releases the
    /// services it owns. Later calls do nothing.
    fn dispose(&self);
    fn is_disposed(&self) -> bool;
}

/// [`System`] implementation shared by every platform variant.
pub struct CommonSystem<P: Platform> {
    platform: P,
    config: SystemConfig,
    use_wintab_api: Cell<bool>,
    registry: ServiceRegistry,
    disposed: Cell<bool>,
}

impl<P: Platform> CommonSystem<P> {
    pub fn new(platform: P, config: SystemConfig) -> Self {
        let use_wintab_api = platform.supports_wintab_api() && config.use_wintab_api;
        tracing::info!("Starting {} system", platform.name());
        Self {
            platform,
            config,
            use_wintab_api: Cell::new(use_wintab_api),
            registry: ServiceRegistry::new(),
            disposed: Cell::new(false),
        }
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn config(&self) -> &SystemConfig {
        &self.config
    }

    pub fn registry(&self) -> &ServiceRegistry {
        &self.registry
    }
}

impl<P: Platform> System for CommonSystem<P> {
    fn platform_name(&self) -> &'static str {
        self.platform.name()
    }

    fn activate_app(&self) {
        self.platform.activate_app();
    }

    fn finish_launching(&self) {
        self.platform.finish_launching();
    }

    fn use_wintab_api(&self, state: bool) {
        if self.platform.supports_wintab_api() {
            self.use_wintab_api.set(state);
        } else {
            tracing::trace!("Wintab flag ignored on {}", self.platform.name());
        }
    }

    fn wintab_api_enabled(&self) -> bool {
        self.use_wintab_api.get()
    }

    fn logger(&self) -> Option<&dyn Logger> {
        self.platform.logger()
    }

    fn native_dialogs(&self) -> Option<Rc<dyn NativeDialogs>> {
        self.registry.native_dialogs(&self.platform)
    }

    fn menus(&self) -> Option<Rc<dyn Menus>> {
        self.registry.menus(&self.platform)
    }

    fn event_queue(&self) -> Rc<EventQueue> {
        EventQueue::instance()
    }

    fn load_sprite_sheet_font(&self, path: &Path, scale: u32) -> SystemResult<Font> {
        let mut sheet = self.platform.load_rgba_surface(path).map_err(|err| {
            tracing::warn!("Cannot load sprite sheet {}: {}", path.display(), err);
            err
        })?;
        sheet.apply_scale(scale).map_err(|err| {
            tracing::warn!("Cannot scale sprite sheet {}: {}", path.display(), err);
            err
        })?;

        let font = SpriteSheetFont::from_surface(sheet).ok_or_else(|| {
            tracing::warn!("Sprite sheet {} has no glyphs", path.display());
            SystemError::EmptyGlyphSheet {
                path: path.to_path_buf(),
            }
        })?;
        Ok(Font::SpriteSheet(font))
    }

    fn load_true_type_font(&self, path: &Path, pixel_height: f32) -> SystemResult<Font> {
        let engine = self
            .registry
            .outline_engine(&self.platform, self.config.cache_outline_faces)
            .ok_or(SystemError::Disposed)?;

        match engine.load_font(path, pixel_height) {
            Ok(font) => Ok(Font::Outline(font)),
            Err(err) => {
                tracing::warn!("Cannot load font {}: {}", path.display(), err);
                Err(err)
            }
        }
    }

    fn key_modifiers(&self) -> KeyModifiers {
        resolve_modifiers(|key| self.platform.is_key_pressed(key))
    }

    fn is_key_pressed(&self, key: KeyScancode) -> bool {
        self.platform.is_key_pressed(key)
    }

    fn dispose(&self) {
        if self.disposed.replace(true) {
            tracing::debug!("{} system already disposed", self.platform.name());
            return;
        }

        release_instance(self as *const Self as *const ());
        self.registry.dispose();
        tracing::info!("Disposed {} system", self.platform.name());
    }

    fn is_disposed(&self) -> bool {
        self.disposed.get()
    }
}

thread_local! {
    static INSTANCE: RefCell<Option<Rc<dyn System>>> = const { RefCell::new(None) };
}

/// The system installed on this thread, if any.
pub fn instance() -> Option<Rc<dyn System>> {
    INSTANCE.with(|slot| slot.borrow().clone())
}

/// Makes `system` the current instance for this thread.
///
/// Fails if another system is already installed; dispose it first.
pub fn install<S>(system: S) -> SystemResult<Rc<dyn System>>
where
    S: System + 'static,
{
    INSTANCE.with(|slot| {
        let mut slot = slot.borrow_mut();
        if slot.is_some() {
            return Err(SystemError::AlreadyInitialized);
        }
        let system: Rc<dyn System> = Rc::new(system);
        *slot = Some(Rc::clone(&system));
        Ok(system)
    })
}

/// Creates the system for the platform this crate was built for and installs
/// it as the current instance.
pub fn create_system(config: SystemConfig) -> SystemResult<Rc<dyn System>> {
    install(CommonSystem::new(ActivePlatform::default(), config))
}

/// Disposes the current instance, if there is one.
pub fn dispose_instance() {
    if let Some(system) = instance() {
        system.dispose();
    }
}

/// Clears the slot if it holds the system at `system`.
///
/// Identity is the thin data pointer; vtable pointers of `dyn System` are not
/// compared since they may differ between codegen units.
fn release_instance(system: *const ()) {
    let released = INSTANCE.with(|slot| {
        let mut slot = slot.borrow_mut();
        let is_current = slot
            .as_ref()
            .is_some_and(|current| Rc::as_ptr(current) as *const () == system);
        if is_current {
            slot.take()
        } else {
            None
        }
    });
    drop(released);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialogs::{FileDialog, FileDialogKind};
    use crate::dummy_platform::DummyPlatform;
    use crate::font::GlyphProvider;
    use crate::menus::Menu;
    use std::path::PathBuf;

    fn system_with(platform: DummyPlatform) -> CommonSystem<DummyPlatform> {
        CommonSystem::new(platform, SystemConfig::default())
    }

    #[test]
    fn native_dialogs_constructed_once() {
        let system = system_with(DummyPlatform::new().with_native_dialogs());
        let state = system.platform().state();

        let first = system.native_dialogs().unwrap();
        for _ in 0..10 {
            let again = system.native_dialogs().unwrap();
            assert!(Rc::ptr_eq(&first, &again));
        }
        assert_eq!(state.native_dialogs_created.get(), 1);
    }

    #[test]
    fn missing_dialogs_never_construct() {
        let system = system_with(DummyPlatform::new());
        let state = system.platform().state();

        for _ in 0..5 {
            assert!(system.native_dialogs().is_none());
        }
        assert_eq!(state.native_dialogs_created.get(), 0);
        assert_eq!(state.native_dialogs_requested.get(), 1);
    }

    #[test]
    fn menus_constructed_once_and_forward() {
        let system = system_with(DummyPlatform::new().with_menus());
        let state = system.platform().state();

        let menus = system.menus().unwrap();
        let menu = Menu::new().action(1, "About");
        menus.set_app_menu(Some(&menu)).unwrap();
        assert!(Rc::ptr_eq(&menus, &system.menus().unwrap()));

        assert_eq!(state.menus_created.get(), 1);
        assert_eq!(state.app_menu.borrow().as_ref(), Some(&menu));
    }

    #[test]
    fn dialogs_and_menus_are_independent() {
        let system = system_with(DummyPlatform::new().with_menus());
        assert!(system.native_dialogs().is_none());
        assert!(system.menus().is_some());
        assert!(!system.registry().has_outline_engine());
    }

    #[test]
    fn dialog_show_goes_to_platform() {
        let system = system_with(DummyPlatform::new().with_native_dialogs());
        let state = system.platform().state();

        let dialogs = system.native_dialogs().unwrap();
        let request = FileDialog::new(FileDialogKind::SaveFile)
            .with_file_name("out")
            .with_default_extension("png");
        let chosen = dialogs.show(&request).unwrap();

        assert_eq!(chosen, Some(vec![std::path::PathBuf::from("out.png")]));
        assert_eq!(state.shown_dialogs.borrow().len(), 1);
    }

    #[test]
    fn wintab_flag_only_sticks_where_supported() {
        let plain = system_with(DummyPlatform::new());
        assert!(!plain.wintab_api_enabled());
        plain.use_wintab_api(true);
        assert!(!plain.wintab_api_enabled());

        let tablet = system_with(DummyPlatform::new().with_wintab());
        assert!(tablet.wintab_api_enabled());
        tablet.use_wintab_api(false);
        assert!(!tablet.wintab_api_enabled());

        let disabled = CommonSystem::new(
            DummyPlatform::new().with_wintab(),
            SystemConfig::default().with_wintab_api(false),
        );
        assert!(!disabled.wintab_api_enabled());
    }

    #[test]
    fn lifecycle_hooks_forward() {
        let system = system_with(DummyPlatform::new());
        let state = system.platform().state();

        system.activate_app();
        system.finish_launching();
        system.finish_launching();
        assert_eq!(state.activations.get(), 1);
        assert_eq!(state.launches.get(), 2);
    }

    #[test]
    fn logger_comes_from_platform() {
        assert!(system_with(DummyPlatform::new()).logger().is_none());

        let system = system_with(DummyPlatform::new().with_logger());
        system.logger().unwrap().log_error("boom");
        assert_eq!(*system.platform().state().log.borrow(), vec!["boom".to_string()]);
    }

    #[test]
    fn modifiers_are_polled_fresh() {
        let system = system_with(DummyPlatform::new());
        let state = system.platform().state();

        assert_eq!(system.key_modifiers(), KeyModifiers::empty());
        state.press(KeyScancode::AltGr);
        assert_eq!(system.key_modifiers(), KeyModifiers::CTRL | KeyModifiers::ALT);
        state.release(KeyScancode::AltGr);
        state.press(KeyScancode::Space);
        assert_eq!(system.key_modifiers(), KeyModifiers::SPACE);
        assert!(system.is_key_pressed(KeyScancode::Space));
    }

    #[test]
    fn event_queue_is_the_thread_queue() {
        let system = system_with(DummyPlatform::new());
        assert!(Rc::ptr_eq(&system.event_queue(), &EventQueue::instance()));
    }

    #[test]
    fn sheet_loader_never_touches_engine() {
        let system = system_with(DummyPlatform::new());
        let state = system.platform().state();

        let err = system
            .load_sprite_sheet_font(Path::new("/nonexistent/path"), 2)
            .unwrap_err();
        assert!(matches!(err, SystemError::Io { .. }));
        assert_eq!(state.surfaces_loaded.get(), 1);
        assert_eq!(state.outline_engines_created.get(), 0);
    }

    #[test]
    fn outline_loader_builds_one_engine() {
        let system = system_with(DummyPlatform::new());
        let state = system.platform().state();

        for path in ["/nonexistent/path", "/another/missing.ttf"] {
            assert!(system.load_true_type_font(Path::new(path), 16.0).is_err());
        }
        assert_eq!(state.outline_engines_created.get(), 1);
        assert_eq!(state.surfaces_loaded.get(), 0);
    }

    #[test]
    fn oversized_sheet_scale_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sheet.png");
        image::RgbaImage::from_pixel(5, 4, image::Rgba([255, 0, 255, 255]))
            .save(&path)
            .unwrap();

        let system = system_with(DummyPlatform::new());
        let err = system.load_sprite_sheet_font(&path, 1_000_000_000).unwrap_err();
        assert!(
            matches!(err, SystemError::InvalidScale { scale: 1_000_000_000, .. }),
            "got {err}"
        );
    }

    /// Two different TrueType files from the usual system locations.
    fn find_two_system_fonts() -> Option<(PathBuf, PathBuf)> {
        let pairs = [
            (
                "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
                "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
            ),
            (
                "/usr/share/fonts/dejavu/DejaVuSans.ttf",
                "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf",
            ),
            (
                "/usr/share/fonts/TTF/DejaVuSans.ttf",
                "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
            ),
            (
                "/System/Library/Fonts/Supplemental/Arial.ttf",
                "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
            ),
            ("C:\\Windows\\Fonts\\arial.ttf", "C:\\Windows\\Fonts\\arialbd.ttf"),
        ];
        pairs
            .iter()
            .map(|(a, b)| (PathBuf::from(a), PathBuf::from(b)))
            .find(|(a, b)| a.exists() && b.exists())
    }

    #[test]
    fn outline_loads_share_engine_not_handles() {
        let Some((regular, bold)) = find_two_system_fonts() else {
            eprintln!("No pair of system TrueType fonts found, skipping");
            return;
        };
        let system = system_with(DummyPlatform::new());
        let state = system.platform().state();

        let a = system.load_true_type_font(&regular, 14.0).unwrap();
        let b = system.load_true_type_font(&bold, 14.0).unwrap();

        assert_eq!(state.outline_engines_created.get(), 1);
        assert_eq!(state.surfaces_loaded.get(), 0);
        let (a, b) = (a.as_outline().unwrap(), b.as_outline().unwrap());
        assert!(!a.shares_face_with(b));
    }

    #[test]
    fn sheet_font_from_generated_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sheet.png");
        let mut img = image::RgbaImage::from_pixel(5, 4, image::Rgba([255, 0, 255, 255]));
        for y in 1..3 {
            for x in 1..4 {
                img.put_pixel(x, y, image::Rgba([255, 255, 255, 255]));
            }
        }
        img.save(&path).unwrap();

        let system = system_with(DummyPlatform::new());
        let font = system.load_sprite_sheet_font(&path, 3).unwrap();
        assert_eq!(font.height(), 6.0);
        assert_eq!(font.advance(' '), 9.0);
    }

    #[test]
    fn dispose_is_idempotent() {
        let system = system_with(DummyPlatform::new().with_native_dialogs().with_menus());
        let state = system.platform().state();

        let dialogs = system.native_dialogs().unwrap();
        system.menus().unwrap();
        assert_eq!(Rc::strong_count(&dialogs), 2);

        system.dispose();
        assert!(system.is_disposed());
        assert_eq!(Rc::strong_count(&dialogs), 1);
        system.dispose();

        assert!(system.native_dialogs().is_none());
        assert!(system.menus().is_none());
        assert_eq!(state.native_dialogs_created.get(), 1);
        assert!(matches!(
            system.load_true_type_font(Path::new("x.ttf"), 12.0),
            Err(SystemError::Disposed)
        ));
    }

    #[test]
    fn install_and_dispose_clear_the_slot() {
        dispose_instance();
        assert!(instance().is_none());

        let system = install(system_with(DummyPlatform::new())).unwrap();
        let current = instance().unwrap();
        assert!(Rc::ptr_eq(&system, &current));

        let second = install(system_with(DummyPlatform::new()));
        assert!(matches!(second, Err(SystemError::AlreadyInitialized)));

        system.dispose();
        assert!(instance().is_none());
        system.dispose();
        assert!(instance().is_none());
    }

    #[test]
    fn disposing_a_stray_system_keeps_the_installed_one() {
        dispose_instance();
        let installed = install(system_with(DummyPlatform::new())).unwrap();

        let stray = system_with(DummyPlatform::new());
        stray.dispose();
        assert!(Rc::ptr_eq(&instance().unwrap(), &installed));

        dispose_instance();
        assert!(instance().is_none());
    }
}
