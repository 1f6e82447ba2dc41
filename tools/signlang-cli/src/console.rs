//! Terminal display sink.

use signlang_gesture_model::{LiveOutput, SignImage};
use signlang_recognizer::DisplaySink;

/// Prints display updates to stdout.
///
/// Live output changes every frame, so only label changes are printed.
#[derive(Debug, Default)]
pub struct ConsoleDisplay {
    last_label: String,
}

impl DisplaySink for ConsoleDisplay {
    fn show_live(&mut self, output: &LiveOutput) {
        if output.label == self.last_label {
            return;
        }
        self.last_label = output.label.clone();
        if output.label.is_empty() {
            println!("  ·  no gesture");
        } else {
            println!("  ✋ {} ({}%)", output.label, output.confidence_percent);
        }
    }

    fn show_word(&mut self, word: &str) {
        println!("Word formed: {}", if word.is_empty() { "-" } else { word });
    }

    fn show_image(&mut self, image: Option<&SignImage>) {
        match image {
            Some(image) => println!("Practice sign: {} ({})", image.label, image.url),
            None => println!("Press start to practice with images"),
        }
    }
}
