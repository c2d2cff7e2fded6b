//! 升变选择

use chess_core::PromotionKind;

/// 升变选择提供者
///
/// 返回任意文本，由 [`PromotionKind::from_choice`] 解析，缺省或无效时升变为后。
pub trait PromotionHandler: Send {
    fn request_promotion_choice(&mut self, default: PromotionKind) -> Option<String>;
}

/// 不询问，总是使用默认升变
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultPromotion;

impl PromotionHandler for DefaultPromotion {
    fn request_promotion_choice(&mut self, _default: PromotionKind) -> Option<String> {
        None
    }
}

impl<F> PromotionHandler for F
where
    F: FnMut(PromotionKind) -> Option<String> + Send,
{
    fn request_promotion_choice(&mut self, default: PromotionKind) -> Option<String> {
        self(default)
    }
}
