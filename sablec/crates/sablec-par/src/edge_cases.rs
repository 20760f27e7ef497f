//! Edge case tests for sablec-par: recovery on malformed input.
