//! Outbound text blocks.
//!
//! The diagnosis API takes a single human-readable block per submission;
//! field order and labels are fixed per form. The formatters are pure over
//! (draft, timestamp) so fixtures can pin the exact output.

use super::value::{Draft, FieldValue};
use chrono::Local;

/// Timestamp in the local-time form the reports use.
pub fn now_stamp() -> String {
    Local::now().format("%Y/%m/%d %H:%M:%S").to_string()
}

fn get<'a>(draft: &'a Draft, id: &str) -> &'a FieldValue {
    draft.get(id).unwrap_or(&FieldValue::Unset)
}

fn show(draft: &Draft, id: &str) -> String {
    get(draft, id).display()
}

/// 问诊表 block. Optional history/allergy lines appear only when filled.
pub fn format_patient(draft: &Draft, timestamp: &str) -> String {
    let mut block = format!(
        "就诊时间：{}\n姓名：{}\n年龄：{}\n性别：{}\n婚姻状况：{}\n病情描述：{}",
        timestamp,
        show(draft, "name"),
        show(draft, "age"),
        show(draft, "gender"),
        show(draft, "maritalStatus"),
        show(draft, "condition"),
    );
    if !get(draft, "medicalHistory").is_blank() {
        block.push_str(&format!("\n既往病史：{}", show(draft, "medicalHistory")));
    }
    if !get(draft, "allergies").is_blank() {
        block.push_str(&format!("\n过敏史：{}", show(draft, "allergies")));
    }
    block
}

/// 体质测试 block, including BMI derived from height/weight.
pub fn format_constitution(draft: &Draft, timestamp: &str) -> String {
    let bmi = match (
        get(draft, "height").as_number(),
        get(draft, "weight").as_number(),
    ) {
        (Some(h), Some(w)) if h > 0.0 => format!("{:.1}", w / (h / 100.0).powi(2)),
        _ => "未知".to_string(),
    };
    let other = match get(draft, "otherSymptoms") {
        v if v.is_blank() => "无".to_string(),
        v => v.display(),
    };

    format!(
        "体质测试时间：{timestamp}\n\n\
         基本信息：\n\
         姓名：{}\n年龄：{}岁\n性别：{}\n身高：{}cm\n体重：{}kg\nBMI：{bmi}\n\n\
         生活习惯：\n\
         睡眠时间：{}\n运动频率：{}\n工作压力：{}\n饮食偏好：{}\n\n\
         体质症状评分（0-4分）：\n\
         疲劳程度：{}分\n手脚冰冷：{}分\n怕热程度：{}分\n怕冷程度：{}分\n\
         消化问题：{}分\n睡眠质量：{}分\n情绪状态：{}分\n皮肤状况：{}分\n呼吸状况：{}分\n\n\
         中医相关：\n\
         舌质颜色：{}\n舌苔情况：{}\n脉象：{}\n\n\
         其他症状：{other}",
        show(draft, "name"),
        show(draft, "age"),
        show(draft, "gender"),
        show(draft, "height"),
        show(draft, "weight"),
        show(draft, "sleepHours"),
        show(draft, "exerciseFrequency"),
        show(draft, "workStress"),
        show(draft, "dietPreference"),
        show(draft, "fatigue"),
        show(draft, "coldLimbs"),
        show(draft, "heatIntolerance"),
        show(draft, "coldIntolerance"),
        show(draft, "digestion"),
        show(draft, "sleep"),
        show(draft, "emotion"),
        show(draft, "skinCondition"),
        show(draft, "breathing"),
        show(draft, "tongueColor"),
        show(draft, "tongueCoating"),
        show(draft, "pulse"),
    )
}
