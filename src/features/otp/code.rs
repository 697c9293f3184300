//! The six-cell code entered by the user.

/// Number of digits in a code.
pub const CODE_LENGTH: usize = 6;

/// Result of an edit against the code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellEdit {
    /// Input did not pass validation; nothing changed.
    Rejected,
    /// The code changed; `focus` names the cell to move to, if any.
    Changed { focus: Option<usize> },
    /// No cell changed but focus should move.
    Moved { focus: usize },
    Unchanged,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OtpCode {
    cells: [Option<char>; CODE_LENGTH],
}

impl OtpCode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies the full value of the input at `index`. An empty value clears
    /// the cell; exactly one ASCII digit fills it and advances focus.
    pub fn input(&mut self, index: usize, value: &str) -> CellEdit {
        if index >= CODE_LENGTH {
            return CellEdit::Rejected;
        }

        let mut chars = value.chars();
        match (chars.next(), chars.next()) {
            (None, _) => {
                self.cells[index] = None;
                CellEdit::Changed { focus: None }
            }
            (Some(digit), None) if digit.is_ascii_digit() => {
                self.cells[index] = Some(digit);
                let focus = (index + 1 < CODE_LENGTH).then_some(index + 1);
                CellEdit::Changed { focus }
            }
            _ => CellEdit::Rejected,
        }
    }

    /// Backspace at `index`: clears a filled cell in place, or retreats from
    /// an empty one without touching the previous cell.
    pub fn backspace(&mut self, index: usize) -> CellEdit {
        if index >= CODE_LENGTH {
            return CellEdit::Rejected;
        }

        if self.cells[index].take().is_some() {
            CellEdit::Changed { focus: None }
        } else if index > 0 {
            CellEdit::Moved { focus: index - 1 }
        } else {
            CellEdit::Unchanged
        }
    }

    /// Spreads a pasted run of digits from `index` onward. Digits past the
    /// last cell are dropped.
    pub fn paste(&mut self, index: usize, text: &str) -> CellEdit {
        let digits = text.trim();
        if index >= CODE_LENGTH
            || digits.is_empty()
            || !digits.chars().all(|digit| digit.is_ascii_digit())
        {
            return CellEdit::Rejected;
        }

        let mut last = index;
        for (cell, digit) in self.cells[index..].iter_mut().zip(digits.chars()) {
            *cell = Some(digit);
            last += 1;
        }

        CellEdit::Changed {
            focus: Some(last.min(CODE_LENGTH - 1)),
        }
    }

    pub fn cell(&self, index: usize) -> Option<char> {
        self.cells.get(index).copied().flatten()
    }

    pub fn is_complete(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// The concatenated code, only once every cell is filled.
    pub fn value(&self) -> Option<String> {
        self.cells.iter().copied().collect()
    }

    pub fn clear(&mut self) {
        self.cells = [None; CODE_LENGTH];
    }
}
