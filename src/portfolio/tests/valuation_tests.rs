#[cfg(test)]
mod tests {
    use crate::instruments::RawInstrument;
    use crate::portfolio::{calculate_item_metrics, map_raw_portfolio};
    use crate::records::RawRecord;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    // --- Helper Functions ---

    fn buy(date: &str, num_shares: Decimal, price: Decimal, commission: Decimal) -> RawRecord {
        RawRecord {
            execution_date: Some(date.to_string()),
            record_type: Some("buy".to_string()),
            num_shares: Some(num_shares),
            price_per_share: Some(price),
            commission: Some(commission),
            transfer_to: None,
            transfer_from: None,
        }
    }

    fn instrument(
        isin: &str,
        prev_price: Decimal,
        curr_price: Decimal,
        records: Vec<RawRecord>,
    ) -> RawInstrument {
        RawInstrument {
            isin: isin.to_string(),
            name: format!("{} name", isin),
            kind: "Etfs".to_string(),
            link: "some-fund".to_string(),
            prev_price,
            curr_price,
            records,
        }
    }

    #[test]
    fn item_metrics_for_single_lot() {
        let raw = vec![instrument(
            "TEST123",
            dec!(90),
            dec!(110),
            vec![buy("2023-01-01", dec!(10), dec!(100), dec!(5))],
        )];
        let portfolio = map_raw_portfolio(&raw).unwrap();
        let item = &portfolio.items[0];

        assert_eq!(item.num_shares, dec!(10));
        assert_eq!(item.total_invested, dec!(1005));
        assert_eq!(item.market_value, dec!(1100));
        assert_eq!(item.avg_price, dec!(100.5));
        // 1100 - 900
        assert_eq!(item.daily_change_eur, dec!(200));
        assert_eq!(item.daily_change_perc, dec!(22.222222));
        assert_eq!(item.total_change_eur, dec!(95));
        assert_eq!(item.total_change_perc, dec!(9.452736));
        // 10 * (110 - 100.5)
        assert_eq!(item.unrealized_pnl, dec!(95));
    }

    #[test]
    fn zero_previous_price_guards_daily_change() {
        let raw = vec![instrument(
            "TEST123",
            Decimal::ZERO,
            dec!(100),
            vec![buy("2023-01-01", dec!(10), dec!(100), dec!(0))],
        )];
        let portfolio = map_raw_portfolio(&raw).unwrap();

        assert_eq!(portfolio.items[0].daily_change_perc, Decimal::ZERO);
    }

    #[test]
    fn zero_invested_guards_total_change() {
        let raw = vec![instrument("TEST123", dec!(90), dec!(100), vec![])];
        let portfolio = map_raw_portfolio(&raw).unwrap();
        let item = &portfolio.items[0];

        assert_eq!(item.total_invested, Decimal::ZERO);
        assert_eq!(item.total_change_perc, Decimal::ZERO);
        assert_eq!(item.avg_price, Decimal::ZERO);
        assert_eq!(portfolio.summary.portfolio_change_perc, Decimal::ZERO);
    }

    #[test]
    fn empty_input_yields_zeroed_summary() {
        let portfolio = map_raw_portfolio(&[]).unwrap();

        assert!(portfolio.items.is_empty());
        assert_eq!(portfolio.summary.portfolio_invested, Decimal::ZERO);
        assert_eq!(portfolio.summary.portfolio_market_value, Decimal::ZERO);
        assert_eq!(portfolio.summary.portfolio_change_eur, Decimal::ZERO);
        assert_eq!(portfolio.summary.portfolio_change_perc, Decimal::ZERO);
        assert_eq!(portfolio.summary.portfolio_daily_change_eur, Decimal::ZERO);
        assert_eq!(portfolio.summary.portfolio_daily_change_perc, Decimal::ZERO);
    }

    #[test]
    fn summary_percentages_are_rederived_not_summed() {
        // A gains 10%, B loses 10%; summed percentages would cancel to 0,
        // the value-weighted result is -5%
        let raw = vec![
            instrument(
                "AAA",
                dec!(11),
                dec!(11),
                vec![buy("2023-01-01", dec!(10), dec!(10), dec!(0))],
            ),
            instrument(
                "BBB",
                dec!(27),
                dec!(27),
                vec![buy("2023-01-01", dec!(10), dec!(30), dec!(0))],
            ),
        ];
        let portfolio = map_raw_portfolio(&raw).unwrap();

        assert_eq!(portfolio.summary.portfolio_invested, dec!(400));
        assert_eq!(portfolio.summary.portfolio_market_value, dec!(380));
        assert_eq!(portfolio.summary.portfolio_change_eur, dec!(-20));
        assert_eq!(portfolio.summary.portfolio_change_perc, dec!(-5));
        // prev prices equal current: flat day
        assert_eq!(portfolio.summary.portfolio_daily_change_eur, Decimal::ZERO);
        assert_eq!(portfolio.summary.portfolio_daily_change_perc, Decimal::ZERO);
    }

    #[test]
    fn quote_link_is_composed_from_kind_and_stored_link() {
        let raw = vec![instrument("TEST123", dec!(1), dec!(1), vec![])];
        let portfolio = map_raw_portfolio(&raw).unwrap();

        assert_eq!(
            portfolio.items[0].link,
            "https://es.investing.com/etfs/some-fund"
        );
    }

    #[test]
    fn output_is_byte_identical_across_runs() {
        let raw = vec![instrument(
            "TEST123",
            dec!(98.31),
            dec!(101.77),
            vec![
                buy("2023-01-01", dec!(10), dec!(100.37), dec!(5.21)),
                buy("2023-04-11", dec!(2.5), dec!(97.03), dec!(1)),
            ],
        )];
        let first = serde_json::to_string(&map_raw_portfolio(&raw).unwrap()).unwrap();
        let second = serde_json::to_string(&map_raw_portfolio(&raw).unwrap()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn metrics_over_empty_lot_list_are_zero() {
        let metrics = calculate_item_metrics(&[], dec!(90), dec!(100));

        assert_eq!(metrics.num_shares, Decimal::ZERO);
        assert_eq!(metrics.market_value, Decimal::ZERO);
        assert_eq!(metrics.avg_price, Decimal::ZERO);
        assert_eq!(metrics.unrealized_pnl, Decimal::ZERO);
        assert_eq!(metrics.daily_change_perc, Decimal::ZERO);
        assert_eq!(metrics.total_change_perc, Decimal::ZERO);
    }
}
