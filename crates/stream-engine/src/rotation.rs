//! Decorative reference-image rotation.
//!
//! While a session runs, the display cycles through the sign catalogue at a
//! fixed interval. The timer is a deadline polled from the refresh callback:
//! it is armed on start, cancelled on stop, and cannot fire while disarmed.

use std::time::Duration;

use signlang_gesture_model::{SignCatalogue, SignImage};

#[derive(Debug, Clone)]
pub struct ImageRotation {
    catalogue: SignCatalogue,
    interval_ms: u64,
    next_due_ms: Option<u64>,
    cursor: usize,
    current: Option<usize>,
}

impl ImageRotation {
    pub fn new(catalogue: SignCatalogue, interval: Duration) -> Self {
        Self {
            catalogue,
            interval_ms: u64::try_from(interval.as_millis()).unwrap_or(u64::MAX).max(1),
            next_due_ms: None,
            cursor: 0,
            current: None,
        }
    }

    /// Start the timer; the first image appears one interval after `now_ms`.
    pub fn arm(&mut self, now_ms: u64) {
        self.next_due_ms = Some(now_ms.saturating_add(self.interval_ms));
    }

    /// Stop the timer and forget the shown image.
    pub fn cancel(&mut self) {
        self.next_due_ms = None;
        self.current = None;
    }

    pub fn is_armed(&self) -> bool {
        self.next_due_ms.is_some()
    }

    /// Advance to the next image if the deadline has passed.
    ///
    /// Returns the newly shown image, or `None` if nothing changed.
    pub fn poll(&mut self, now_ms: u64) -> Option<&SignImage> {
        let due = self.next_due_ms?;
        if now_ms < due || self.catalogue.is_empty() {
            return None;
        }

        let index = self.cursor % self.catalogue.len();
        self.cursor = index + 1;
        self.current = Some(index);
        self.next_due_ms = Some(now_ms.saturating_add(self.interval_ms));
        self.catalogue.get(index)
    }

    pub fn current(&self) -> Option<&SignImage> {
        self.current.and_then(|index| self.catalogue.get(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rotation() -> ImageRotation {
        ImageRotation::new(SignCatalogue::alphabet(), Duration::from_secs(5))
    }

    #[test]
    fn disarmed_timer_never_fires() {
        let mut rotation = rotation();
        assert!(rotation.poll(60_000).is_none());
        assert!(rotation.current().is_none());
    }

    #[test]
    fn images_advance_every_interval() {
        let mut rotation = rotation();
        rotation.arm(1_000);

        assert!(rotation.poll(5_999).is_none());
        assert_eq!(rotation.poll(6_000).unwrap().label, "A");
        assert!(rotation.poll(10_000).is_none());
        assert_eq!(rotation.poll(11_000).unwrap().label, "B");
        assert_eq!(rotation.current().unwrap().label, "B");
    }

    #[test]
    fn cancel_clears_image_and_deadline() {
        let mut rotation = rotation();
        rotation.arm(0);
        rotation.poll(5_000);
        rotation.cancel();

        assert!(!rotation.is_armed());
        assert!(rotation.current().is_none());
        assert!(rotation.poll(100_000).is_none());
    }

    #[test]
    fn rotation_wraps_around_catalogue() {
        let catalogue = SignCatalogue::new(vec![
            SignImage {
                id: 1,
                label: "yes".to_string(),
                url: "yes.gif".to_string(),
            },
            SignImage {
                id: 2,
                label: "no".to_string(),
                url: "no.gif".to_string(),
            },
        ]);
        let mut rotation = ImageRotation::new(catalogue, Duration::from_millis(10));
        rotation.arm(0);
        let shown: Vec<u32> = [10, 20, 30]
            .iter()
            .filter_map(|t| rotation.poll(*t).map(|image| image.id))
            .collect();
        assert_eq!(shown, vec![1, 2, 1]);
    }

    #[test]
    fn huge_interval_saturates_instead_of_overflowing() {
        let mut rotation = ImageRotation::new(SignCatalogue::alphabet(), Duration::MAX);
        rotation.arm(u64::MAX - 10);
        assert!(rotation.is_armed());
        assert!(rotation.poll(u64::MAX - 1).is_none());
        assert_eq!(rotation.poll(u64::MAX).unwrap().label, "A");
    }

    #[test]
    fn empty_catalogue_shows_nothing() {
        let mut rotation =
            ImageRotation::new(SignCatalogue::new(Vec::new()), Duration::from_millis(10));
        rotation.arm(0);
        assert!(rotation.poll(1_000).is_none());
    }
}
