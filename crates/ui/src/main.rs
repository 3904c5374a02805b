use gpui::*;
use gpui_component::{Root, ThemeRegistry};

use banter::app::{ChatAppShell, NewChat, Quit, ToggleSidebar, default_themes_path};
use banter::settings::SettingsStore;

/// Application entry point.
///
/// Bootstraps the GPUI application with:
/// 1. Asset loading via gpui-component-assets
/// 2. gpui-component initialization (required for Root and themes)
/// 3. Settings loading from the user config directory
/// 4. Theme loading/watching from ./themes directory (non-fatal if missing)
/// 5. Window creation with Root wrapper for gpui-component composition
fn main() {
    // Initialize tracing for development debugging
    tracing_subscriber::fmt::init();

    // Create application with bundled assets
    let app = Application::new().with_assets(gpui_component_assets::Assets);

    app.run(|cx| {
        // Initialize gpui-component - REQUIRED before any Root usage
        // This sets up the theme system and component registry
        gpui_component::init(cx);

        let settings_store = SettingsStore::load();
        if let Err(error) = settings_store.ensure_on_disk() {
            tracing::warn!("failed to write initial settings file: {error}");
        }
        let settings = settings_store.settings();

        // Attempt to load and watch themes from ./themes directory
        // This is non-fatal: if the directory doesn't exist or is empty,
        // the app falls back to default built-in themes
        if let Err(err) = ThemeRegistry::watch_dir(default_themes_path(), cx, |_cx| {
            let settings_store = SettingsStore::load();
            settings_store.settings().apply_theme(None, _cx);
            tracing::info!("Theme directory watch initialized");
        }) {
            tracing::warn!(
                "Failed to watch themes directory: {}. Using default themes.",
                err
            );
            settings.apply_theme(None, cx);
        }

        // Register global action handlers
        // Quit action: cleanly shut down the application
        cx.on_action(|_: &Quit, cx| {
            cx.quit();
        });

        // Global keyboard shortcuts
        cx.bind_keys([
            KeyBinding::new("cmd-q", Quit, None),
            KeyBinding::new("cmd-n", NewChat, None),
            KeyBinding::new("cmd-b", ToggleSidebar, None),
        ]);

        // Spawn async window creation to ensure all initialization is complete
        cx.spawn(async move |cx| {
            cx.update(|cx| {
                let options = WindowOptions {
                    window_bounds: Some(WindowBounds::Windowed(Bounds::centered(
                        None,
                        size(px(1200.), px(800.)),
                        cx,
                    ))),
                    titlebar: Some(TitlebarOptions {
                        appears_transparent: true,
                        // Align traffic lights with the top title bar inset.
                        traffic_light_position: Some(point(px(9.), px(9.))),
                        ..Default::default()
                    }),
                    ..Default::default()
                };

                // Open the main window with Root wrapper
                // Root is REQUIRED by gpui-component for dialogs/sheets
                let mut shell_slot = None;
                let window_handle = cx
                    .open_window(options, |window, cx| {
                        let shell = cx.new(|cx| ChatAppShell::new(&settings, window, cx));
                        shell_slot = Some(shell.clone());

                        cx.new(|cx| Root::new(shell, window, cx))
                    })
                    .expect("failed to open main window");

                // Route the shell-level keybindings to the shell entity.
                if let Some(shell) = shell_slot {
                    cx.on_action({
                        let shell = shell.clone();
                        move |_: &ToggleSidebar, cx| {
                            shell.update(cx, |shell, cx| {
                                shell.toggle_sidebar(cx);
                            });
                        }
                    });

                    cx.on_action(move |_: &NewChat, cx| {
                        window_handle
                            .update(cx, |_, window, cx| {
                                shell.update(cx, |shell, cx| {
                                    shell.new_chat(window, cx);
                                });
                            })
                            .ok();
                    });
                }

                // Activate the application
                cx.activate(true);
            })
        })
        .detach();
    });
}
