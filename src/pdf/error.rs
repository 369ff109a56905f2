//! PDF 渲染错误

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("字体 {0} 没有内置度量，无法排版")]
    UnsupportedFont(String),

    #[error("PDF 写入失败: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("渲染任务异常终止: {0}")]
    Task(String),
}
