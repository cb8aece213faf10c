//! HTML fragments rendered by the front end.
//!
//! Model output is inserted verbatim; the front end renders these fragments
//! as Markdown with inline HTML.

const CARD_STYLE: &str =
    "border:1px solid #D8D8DA; border-radius:8px; padding:12px; background-color:#ffffff;";

pub const SPEECH_NOT_RECOGNIZED: &str = "음성을 인식하지 못했어요. 다시 말씀해 주세요.";
pub const SPEECH_SERVICE_ERROR: &str = "음성 인식 서비스에 문제가 발생했어요.";
pub const IMAGE_NOT_RECOGNIZED: &str = "이미지를 인식할 수 없어요. 다시 시도해 주세요.";
pub const IMAGE_ANALYSIS_ERROR: &str = "이미지 분석 중 오류가 발생했어요.";

pub const GOOD_CHOICE_MESSAGE: &str =
    "<div style='font-size: 26px; font-weight: bold;'>💡 좋은 생각이야! ☺️ 탐정에게 물어보자!</div>";
pub const BAD_CHOICE_MESSAGE: &str =
    "<div style='font-size: 26px; font-weight: bold;'>📚 그러면 안 돼! ❌ 😵 분리수거를 같이 배워보자!</div>";

/// The detective's reply to a spoken question.
pub fn voice_answer(answer: &str) -> String {
    format!(
        "\n### 🔍 탐정의 대답\n<div style=\"{CARD_STYLE}\">\n{answer}\n</div>\n"
    )
}

/// The card naming the detected item.
pub fn label_card(label: &str) -> String {
    format!("### 🔍 탐정의 대답  \n<div style=\"{CARD_STYLE}\">{label}</div>")
}

/// The disposal explanation card.
pub fn explanation_card(explanation: &str) -> String {
    format!(
        "### ♻️이렇게 버려요!  \n<div style=\"{CARD_STYLE}\">{explanation}<br><br>👍 환경을 생각하는 멋진 선택이에요 🌱</div>"
    )
}

pub fn quiz_correct() -> String {
    r#"
<audio autoplay>
    <source src="/static/correct.mp3" type="audio/mpeg">
</audio>
<div class="correct-animate">
    🎉 <b>정답이에요!</b><br>종이컵은 일반 쓰레기예요! ♻️
</div>
"#
    .to_string()
}

pub fn quiz_wrong() -> String {
    r#"
<audio autoplay>
    <source src="/static/wrong.mp3" type="audio/mpeg">
</audio>
<div class="wrong-animate">
    😢 <b>틀렸어요!</b><br>종이컵은 코팅 때문에 재활용이 안 돼요!
</div>
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cards_embed_content() {
        assert!(voice_answer("분리수거 하자! 😊").contains("분리수거 하자! 😊"));
        assert!(voice_answer("x").starts_with("\n### 🔍 탐정의 대답"));

        let label = label_card("종이류");
        assert!(label.contains(">종이류</div>"));

        let explanation = explanation_card("깨끗이 펴서 버려요");
        assert!(explanation.starts_with("### ♻️이렇게 버려요!"));
        assert!(explanation.contains("깨끗이 펴서 버려요<br><br>👍"));
    }
}
