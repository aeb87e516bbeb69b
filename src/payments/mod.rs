pub mod payu;
pub mod razorpay;
