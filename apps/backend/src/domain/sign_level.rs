/// Level of a pooled sign as stored in `signs.level`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignLevel {
    Empty,
    TopTop,
    Top,
    Special,
}

impl SignLevel {
    pub const fn from_i32(level: i32) -> Option<SignLevel> {
        match level {
            0 => Some(SignLevel::Empty),
            1 => Some(SignLevel::TopTop),
            2 => Some(SignLevel::Top),
            3 => Some(SignLevel::Special),
            _ => None,
        }
    }

    pub const fn as_i32(&self) -> i32 {
        match self {
            SignLevel::Empty => 0,
            SignLevel::TopTop => 1,
            SignLevel::Top => 2,
            SignLevel::Special => 3,
        }
    }

    pub const fn title(&self) -> &'static str {
        match self {
            SignLevel::Empty => "空签",
            SignLevel::TopTop => "上上签",
            SignLevel::Top => "上签",
            SignLevel::Special => "特签",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignDisplay {
    pub title: String,
    pub description: String,
}

/// Display text for a drawn sign. Unknown levels use the sign's type label.
pub fn display(level: i32, type_label: &str) -> SignDisplay {
    let level = SignLevel::from_i32(level);
    let title = level
        .map(|l| l.title().to_string())
        .unwrap_or_else(|| type_label.to_string());
    let description = match level {
        Some(SignLevel::Empty) => "所行皆明，所向皆顺。新年快乐！".to_string(),
        _ => format!("恭喜抽中{title}，祝新年顺遂。"),
    };
    SignDisplay { title, description }
}
