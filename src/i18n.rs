//! UI strings in the two supported languages.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    #[default]
    En,
    Zh,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::En, Language::Zh];

    /// Name shown in the language picker, in the language itself.
    pub fn native_name(&self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Zh => "中文",
        }
    }

    pub fn strings(&self) -> &'static Strings {
        match self {
            Language::En => &EN,
            Language::Zh => &ZH,
        }
    }
}

/// Every label the desktop shell shows.
#[derive(Debug)]
pub struct Strings {
    pub title: &'static str,
    pub drop_hint: &'static str,
    pub paste_hint: &'static str,
    pub open: &'static str,
    pub paste: &'static str,
    pub loading: &'static str,
    pub tool_select: &'static str,
    pub tool_blur: &'static str,
    pub tool_pixelate: &'static str,
    pub tool_block: &'static str,
    pub tool_text: &'static str,
    pub blur_radius: &'static str,
    pub pixel_size: &'static str,
    pub block_color: &'static str,
    pub font_size: &'static str,
    pub undo: &'static str,
    pub delete: &'static str,
    pub clear_all: &'static str,
    pub auto_redact: &'static str,
    pub scanning: &'static str,
    pub copy: &'static str,
    pub copied: &'static str,
    pub download: &'static str,
    pub saved_to: &'static str,
    pub pages: &'static str,
    pub enter_text: &'static str,
    pub edit_text: &'static str,
    pub background: &'static str,
    pub confirm: &'static str,
    pub cancel: &'static str,
    pub selected: &'static str,
    pub zoom: &'static str,
    pub reset_view: &'static str,
    pub error: &'static str,
}

pub static EN: Strings = Strings {
    title: "PrivacyBlur",
    drop_hint: "Drop an image or PDF here",
    paste_hint: "or paste a screenshot with Ctrl+V",
    open: "Open path",
    paste: "Paste",
    loading: "Loading...",
    tool_select: "Select",
    tool_blur: "Blur",
    tool_pixelate: "Pixelate",
    tool_block: "Block",
    tool_text: "Text",
    blur_radius: "Blur radius",
    pixel_size: "Pixel size",
    block_color: "Block color",
    font_size: "Font size",
    undo: "Undo",
    delete: "Delete",
    clear_all: "Clear all",
    auto_redact: "Auto redact",
    scanning: "Scanning...",
    copy: "Copy",
    copied: "Copied to clipboard",
    download: "Download",
    saved_to: "Saved to",
    pages: "Pages",
    enter_text: "Enter text",
    edit_text: "Edit text",
    background: "Background",
    confirm: "OK",
    cancel: "Cancel",
    selected: "Selected",
    zoom: "Zoom",
    reset_view: "Reset view",
    error: "Error",
};

pub static ZH: Strings = Strings {
    title: "PrivacyBlur",
    drop_hint: "将图片或 PDF 拖到这里",
    paste_hint: "或按 Ctrl+V 粘贴截图",
    open: "打开路径",
    paste: "粘贴",
    loading: "加载中...",
    tool_select: "选择",
    tool_blur: "模糊",
    tool_pixelate: "马赛克",
    tool_block: "色块",
    tool_text: "文字",
    blur_radius: "模糊半径",
    pixel_size: "像素大小",
    block_color: "色块颜色",
    font_size: "字号",
    undo: "撤销",
    delete: "删除",
    clear_all: "全部清除",
    auto_redact: "自动打码",
    scanning: "识别中...",
    copy: "复制",
    copied: "已复制到剪贴板",
    download: "下载",
    saved_to: "已保存到",
    pages: "页面",
    enter_text: "输入文字",
    edit_text: "编辑文字",
    background: "背景色",
    confirm: "确定",
    cancel: "取消",
    selected: "已选中",
    zoom: "缩放",
    reset_view: "重置视图",
    error: "错误",
};
