/// Lifecycle and environment signals fed to the animation worker. These
/// mirror what a wallpaper host delivers: they arrive asynchronously and
/// are handled strictly in order by the worker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    /// Device unlocked; bubbles swell back to full size.
    Unlocked,
    /// Screen turned off; bubbles drop to a third of their size at once.
    ScreenOff,
    /// System theme may have flipped between day and night.
    ThemeChanged,
    /// Accent color may have changed (theme or package change).
    AccentColorChanged,
    TouchDown(i32, i32),
    TouchUp,
    /// Launcher zoom level in [0, 1].
    ZoomChanged(f32),
    VisibilityChanged(bool),
    /// New surface dimensions; the whole layout is regenerated.
    SurfaceChanged(u32, u32),
    /// Stop the worker.
    Shutdown,
}
