use crate::config::MarqueeSettings;

/// Continuously looping horizontal status readout.
///
/// Movement is computed per frame rather than delegated to the renderer:
/// the offset grows by a fixed step each frame and wraps once the content
/// has fully exited the viewport, so scroll speed is frame-rate-normalized
/// and independent of content length. The renderer draws the joined text at
/// [`position`](Self::position) and a shadow copy one content width to the
/// right, which slides in as the first copy exits.
#[derive(Debug)]
pub struct Marquee {
    text: String,
    step: f32,
    char_width: f32,
    content_width: f32,
    offset: f32,
    running: bool,
}

impl Marquee {
    pub fn new(settings: &MarqueeSettings) -> Self {
        let mut marquee = Self {
            text: String::new(),
            step: settings.step.max(0.0),
            char_width: settings.char_width,
            content_width: 1.0,
            offset: 0.0,
            running: true,
        };
        marquee.set_messages(&settings.messages, &settings.separator);
        marquee
    }

    /// Replaces the message set and restarts the loop from the seam.
    pub fn set_messages(&mut self, messages: &[String], separator: &str) {
        let mut text = messages.join(separator);
        // Trailing separator keeps a gap at the loop seam.
        text.push_str(separator);
        self.text = text;
        self.content_width = self.estimate_width().max(1.0);
        self.offset = 0.0;
    }

    /// Joined text the renderer should draw (twice, one content width apart).
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Overrides the estimated content width with a measured one.
    pub fn set_content_width(&mut self, width: f32) {
        if width > 0.0 {
            self.content_width = width;
            self.offset = self.offset.rem_euclid(width);
        }
    }

    pub fn content_width(&self) -> f32 {
        self.content_width
    }

    /// Current horizontal position of the primary copy, in (-width, 0].
    pub fn position(&self) -> f32 {
        -self.offset
    }

    /// Position of the shadow copy that closes the loop.
    pub fn shadow_position(&self) -> f32 {
        self.position() + self.content_width
    }

    /// Advances the scroll by one frame and returns the new position.
    /// Does nothing once stopped.
    pub fn frame(&mut self) -> f32 {
        if self.running {
            self.offset = (self.offset + self.step).rem_euclid(self.content_width);
        }
        self.position()
    }

    /// Re-arms the loop after a [`stop`](Self::stop). Restarting an already
    /// running loop is a no-op.
    pub fn start(&mut self) {
        self.running = true;
    }

    /// Cancels the loop; the position freezes where it is.
    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    fn estimate_width(&self) -> f32 {
        self.text.chars().count() as f32 * self.char_width
    }
}
